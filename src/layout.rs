//! Row/column layout without a widget tree.
//!
//! A [`Layout`] is a cursor over a container body. Rows declare their column
//! widths and a height; each call to [`Layout::next`] hands out the next cell
//! and wraps onto a new row with the same widths once the row is full.

use crate::math::{Rect, Vector2};
use crate::style::Style;

/// Maximum number of columns in one row.
pub const MAX_WIDTHS: usize = 16;

/// Width or height that extends to the far edge of the body.
pub const FILL: i32 = -1;

/// Far below any reachable coordinate, so the first cell always raises `max`.
const MAX_SENTINEL: i32 = -0x1000000;

/// How a rect passed to [`Layout::set_next`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Relative to the body; the cursor advances past it like a normal cell.
    Relative,
    /// Screen coordinates; the cursor is left untouched.
    Absolute,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub(crate) body: Rect,
    pub(crate) next: Rect,
    pub(crate) next_type: Option<Placement>,
    pub(crate) position: Vector2,
    pub(crate) size: Vector2,
    pub(crate) max: Vector2,
    pub(crate) widths: Vec<i32>,
    pub(crate) item_index: usize,
    pub(crate) next_row: i32,
    pub(crate) indent: i32,
}

impl Layout {
    /// Starts a layout over `body`, shifted by the container's scroll offset.
    pub fn new(body: Rect, scroll: Vector2) -> Self {
        let mut layout = Self {
            body: Rect::new(body.x - scroll.x, body.y - scroll.y, body.w, body.h),
            next: Rect::default(),
            next_type: None,
            position: Vector2::ZERO,
            size: Vector2::ZERO,
            max: Vector2::new(MAX_SENTINEL, MAX_SENTINEL),
            widths: Vec::new(),
            item_index: 0,
            next_row: 0,
            indent: 0,
        };
        layout.row(&[], 0);
        layout
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Bottom-right-most point any cell has reached, in screen space.
    pub fn max(&self) -> Vector2 {
        self.max
    }

    pub fn indent(&self) -> i32 {
        self.indent
    }

    pub(crate) fn add_indent(&mut self, delta: i32) {
        self.indent += delta;
    }

    /// Starts a new row. Widths beyond [`MAX_WIDTHS`] are ignored.
    pub fn row(&mut self, widths: &[i32], height: i32) {
        if widths.len() > MAX_WIDTHS {
            tracing::warn!(
                "layout row declares {} columns, keeping the first {MAX_WIDTHS}",
                widths.len()
            );
        }
        self.widths.clear();
        self.widths
            .extend_from_slice(&widths[..widths.len().min(MAX_WIDTHS)]);
        self.position = Vector2::new(self.indent, self.next_row);
        self.size.y = height;
        self.item_index = 0;
    }

    /// Width used by rows that declare no columns.
    pub fn set_width(&mut self, width: i32) {
        self.size.x = width;
    }

    pub fn set_height(&mut self, height: i32) {
        self.size.y = height;
    }

    /// Overrides the rect handed out by the next call to [`next`](Self::next).
    pub fn set_next(&mut self, rect: Rect, placement: Placement) {
        self.next = rect;
        self.next_type = Some(placement);
    }

    /// Hands out the next cell in screen space and advances the cursor.
    pub fn next(&mut self, style: &Style) -> Rect {
        let mut res = match self.next_type.take() {
            Some(Placement::Absolute) => return self.next,
            Some(Placement::Relative) => self.next,
            None => self.next_cell(style),
        };

        self.position.x += res.w + style.spacing;
        self.next_row = self.next_row.max(res.y + res.h + style.spacing);

        res = res.translate(self.body.origin());
        self.max.x = self.max.x.max(res.right());
        self.max.y = self.max.y.max(res.bottom());
        res
    }

    fn next_cell(&mut self, style: &Style) -> Rect {
        // a row without widths holds a single cell
        if self.item_index >= self.widths.len().max(1) {
            let widths = std::mem::take(&mut self.widths);
            self.row(&widths, self.size.y);
        }

        let mut res = Rect::new(self.position.x, self.position.y, 0, self.size.y);
        res.w = match self.widths.get(self.item_index) {
            Some(0) => self.zero_share(style),
            Some(&w) => w,
            None if self.size.x == 0 => style.default_control_width(),
            None => self.size.x,
        };
        if res.h == 0 {
            res.h = style.default_row_height();
        }
        if res.w < 0 {
            res.w = (res.w + self.body.w - res.x + 1).max(0);
        }
        if res.h < 0 {
            res.h = (res.h + self.body.h - res.y + 1).max(0);
        }

        self.item_index += 1;
        res
    }

    /// Equal split of the width left after indent, fixed columns and spacing.
    /// Columns running to the edge take a share too, so they keep room.
    fn zero_share(&self, style: &Style) -> i32 {
        let shares = self.widths.iter().filter(|&&w| w <= 0).count() as i32;
        let fixed: i32 = self.widths.iter().filter(|&&w| w > 0).sum();
        let gaps = style.spacing * (self.widths.len() as i32 - 1);
        let left = self.body.w - self.indent - fixed - gaps;
        (left / shares.max(1)).max(0)
    }

    /// Folds a finished column back into its parent.
    pub(crate) fn merge_column(&mut self, column: &Layout) {
        self.position.x = self
            .position
            .x
            .max(column.position.x + column.body.x - self.body.x);
        self.next_row = self
            .next_row
            .max(column.next_row + column.body.y - self.body.y);
        self.max.x = self.max.x.max(column.max.x);
        self.max.y = self.max.y.max(column.max.y);
    }
}
