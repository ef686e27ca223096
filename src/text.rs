use std::ops::Range;

use crate::errors::Error;
use crate::id::Id;
use crate::math::Vector2;
use crate::text_input::TextEditState;

/// Font metrics collaborator. Must be deterministic within a frame.
pub trait TextMetrics {
    fn text_width(&self, text: &str) -> i32;
    fn line_height(&self) -> i32;
}

/// Fixed advance per character. Useful for bitmap fonts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl MonospaceMetrics {
    pub const fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(6, 13)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

/// Platform text-composition service (IME) for focused text boxes.
///
/// Called once per frame for the focused box with the caret position in
/// screen space. Returns `Ok(true)` when it consumed the editing keys itself.
/// An `Err` makes the text box skip its input for that frame.
pub trait TextComposer {
    fn compose(&mut self, id: Id, caret: Vector2, state: &mut TextEditState) -> Result<bool, Error>;
}

/// Splits `text` into byte ranges that fit `max_width`, breaking at spaces and
/// newlines. A single word wider than the line is kept whole.
pub fn wrap_lines(text: &str, max_width: i32, metrics: &dyn TextMetrics) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut lines = Vec::new();
    let mut p = 0;
    loop {
        let start = p;
        let mut end = p;
        let mut w = 0;
        loop {
            let word = p;
            while p < len && bytes[p] != b' ' && bytes[p] != b'\n' {
                p += 1;
            }
            w += metrics.text_width(&text[word..p]);
            if w > max_width && end != start {
                break;
            }
            if p < len {
                w += metrics.text_width(&text[p..p + 1]);
            }
            end = p;
            p += 1;
            if end >= len || bytes[end] == b'\n' {
                break;
            }
        }
        lines.push(start..end.min(len));
        p = end + 1;
        if end >= len {
            break;
        }
    }
    lines
}
