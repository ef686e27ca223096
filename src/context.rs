use rustc_hash::FxHashMap;

use crate::color::Color;
use crate::container::Container;
use crate::errors::{Error, ErrorType};
use crate::id::{Id, IdSource, IdStack};
use crate::input::{Input, InputSource};
use crate::layout::{Layout, Placement};
use crate::math::{Rect, Vector2};
use crate::pool::Pool;
use crate::render_commands::{Clipping, Command, CommandList, Commands, Icon, Renderer};
use crate::style::{ColorId, Config, Style};
use crate::text::{TextComposer, TextMetrics};
use crate::text_input::TextEditState;
use crate::widgets::Options;

/// The whole UI session: persistent widget state plus the current frame's
/// stacks and command list.
///
/// Declare widgets between [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame), then replay the result with
/// [`render`](Self::render) or [`commands`](Self::commands).
pub struct Context {
    pub(crate) style: Style,
    pub(crate) metrics: Box<dyn TextMetrics>,
    pub(crate) composer: Option<Box<dyn TextComposer>>,
    pub(crate) input: Input,
    pub(crate) tick: u64,

    pub(crate) hover: Option<Id>,
    pub(crate) focus: Option<Id>,
    pub(crate) updated_focus: bool,
    pub(crate) last_id: Option<Id>,
    pub(crate) last_rect: Rect,
    pub(crate) last_zindex: i32,
    pub(crate) hover_root: Option<usize>,
    pub(crate) next_hover_root: Option<usize>,
    pub(crate) scroll_target: Option<usize>,
    pub(crate) number_edit: Option<Id>,
    pub(crate) number_edit_buf: String,

    pub(crate) commands: CommandList,
    pub(crate) root_list: Vec<usize>,
    pub(crate) container_stack: Vec<usize>,
    pub(crate) clip_stack: Vec<Rect>,
    pub(crate) id_stack: IdStack,
    pub(crate) layout_stack: Vec<Layout>,

    pub(crate) container_pool: Pool,
    pub(crate) containers: Vec<Container>,
    pub(crate) treenode_pool: Pool,
    pub(crate) text_edits: FxHashMap<Id, TextEditState>,
}

impl Context {
    pub fn new(metrics: impl TextMetrics + 'static) -> Self {
        Self::with_config(Config::default(), metrics)
    }

    pub fn with_config(config: Config, metrics: impl TextMetrics + 'static) -> Self {
        let container_pool_size = config.container_pool_size.max(1);
        Self {
            style: config.style,
            metrics: Box::new(metrics),
            composer: None,
            input: Input::default(),
            tick: 0,
            hover: None,
            focus: None,
            updated_focus: false,
            last_id: None,
            last_rect: Rect::default(),
            last_zindex: 0,
            hover_root: None,
            next_hover_root: None,
            scroll_target: None,
            number_edit: None,
            number_edit_buf: String::new(),
            commands: CommandList::new(),
            root_list: Vec::new(),
            container_stack: Vec::new(),
            clip_stack: Vec::new(),
            id_stack: IdStack::new(),
            layout_stack: Vec::new(),
            container_pool: Pool::new(container_pool_size),
            containers: vec![Container::default(); container_pool_size],
            treenode_pool: Pool::new(config.treenode_pool_size.max(1)),
            text_edits: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    #[inline]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Feed platform events here before declaring any widget.
    #[inline]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn poll_input<S: InputSource + ?Sized>(&mut self, source: &mut S) {
        source.poll(&mut self.input);
    }

    /// Installs the platform text composition service used by focused text boxes.
    pub fn set_text_composer(&mut self, composer: impl TextComposer + 'static) {
        self.composer = Some(Box::new(composer));
    }

    pub fn clear_text_composer(&mut self) {
        self.composer = None;
    }

    /// Frames started so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn text_width(&self, text: &str) -> i32 {
        self.metrics.text_width(text)
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height()
    }

    pub fn begin_frame(&mut self) {
        self.commands.clear();
        // entry point of replay, patched to the lowest root in end_frame
        self.commands.push_jump();
        self.root_list.clear();
        self.scroll_target = None;
        self.hover_root = self.next_hover_root;
        self.next_hover_root = None;
        self.input.begin_frame();
        self.tick += 1;
        tracing::trace!(tick = self.tick, "begin frame");
    }

    pub fn end_frame(&mut self) {
        if let Err(err) = self.check_stacks() {
            debug_assert!(false, "{err}");
            tracing::error!(%err, "unbalanced stacks at end of frame");
            self.reset_stacks();
        }

        if let Some(idx) = self.scroll_target {
            let delta = self.input.scroll_delta;
            self.containers[idx].scroll += delta;
            self.clamp_scroll(idx);
        }

        if !self.updated_focus {
            self.focus = None;
        }
        self.updated_focus = false;
        // edit state only outlives the frame for the focused box
        let focus = self.focus;
        self.text_edits.retain(|&id, _| Some(id) == focus);

        if !self.input.mouse_pressed.is_empty() {
            if let Some(idx) = self.next_hover_root {
                let zindex = self.containers[idx].zindex;
                if zindex < self.last_zindex && zindex >= 0 {
                    self.bring_to_front(idx);
                }
            }
        }

        self.input.end_frame();

        let containers = &self.containers;
        self.root_list.sort_by_key(|&idx| containers[idx].zindex);
        self.link_roots();

        tracing::trace!(
            tick = self.tick,
            commands = self.commands.len(),
            roots = self.root_list.len(),
            "end frame"
        );
    }

    /// Runs `f` between [`begin_frame`](Self::begin_frame) and [`end_frame`](Self::end_frame).
    pub fn frame(&mut self, f: impl FnOnce(&mut Self)) {
        self.begin_frame();
        f(self);
        self.end_frame();
    }

    /// Chains the root containers into draw order: the entry jump enters the
    /// lowest one, each tail enters the next, and the last tail leaves the list.
    fn link_roots(&mut self) {
        let end = self.commands.len();
        for (i, &idx) in self.root_list.iter().enumerate() {
            let Container { head, tail, .. } = self.containers[idx];
            let (Some(head), Some(tail)) = (head, tail) else {
                continue;
            };
            if i == 0 {
                self.commands.set_jump(0, head + 1);
            }
            let next = self
                .root_list
                .get(i + 1)
                .and_then(|&next| self.containers[next].head)
                .map_or(end, |next_head| next_head + 1);
            self.commands.set_jump(tail, next);
        }
    }

    /// Reports scopes left open by the current frame.
    pub fn check_stacks(&self) -> Result<(), Error> {
        let ids = self.id_stack.depth();
        let clips = self.clip_stack.len();
        let containers = self.container_stack.len();
        let layouts = self.layout_stack.len();
        if ids + clips + containers + layouts == 0 {
            return Ok(());
        }
        Err(Error::new(
            ErrorType::StackImbalance,
            format!(
                "{ids} id scopes, {clips} clip rects, {containers} containers and {layouts} layouts left open"
            ),
        ))
    }

    fn reset_stacks(&mut self) {
        self.id_stack.clear();
        self.clip_stack.clear();
        self.container_stack.clear();
        self.layout_stack.clear();
    }

    /// Draw commands of the last frame in z-order.
    pub fn commands(&self) -> Commands<'_> {
        self.commands.iter()
    }

    pub fn command_list(&self) -> &CommandList {
        &self.commands
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        crate::render_commands::replay(self.commands.iter(), renderer);
    }

    // id scopes

    /// Enters the scope of `source` and returns its id.
    pub fn push_id<S: IdSource + ?Sized>(&mut self, source: &S) -> Id {
        let id = self.id_stack.push(source);
        self.last_id = Some(id);
        id
    }

    pub fn pop_id(&mut self) {
        self.id_stack.pop();
    }

    /// Id of `source` in the current scope.
    pub fn get_id<S: IdSource + ?Sized>(&mut self, source: &S) -> Id {
        let id = self.id_stack.derive(source);
        self.last_id = Some(id);
        id
    }

    pub fn with_id<S: IdSource + ?Sized, R>(&mut self, source: &S, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_id(source);
        let res = f(self);
        self.pop_id();
        res
    }

    pub fn last_id(&self) -> Option<Id> {
        self.last_id
    }

    // clipping

    /// Pushes `rect` intersected with the current clip rect.
    pub fn push_clip_rect(&mut self, rect: Rect) {
        let last = self.clip_rect();
        self.clip_stack.push(rect.intersect(last));
    }

    pub fn pop_clip_rect(&mut self) {
        self.clip_stack.pop();
    }

    pub fn clip_rect(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(Rect::UNCLIPPED)
    }

    pub fn check_clip(&self, rect: Rect) -> Clipping {
        Clipping::of(rect, self.clip_rect())
    }

    fn set_clip(&mut self, rect: Rect) {
        self.commands.push(Command::Clip { rect });
    }

    // layout

    pub(crate) fn push_layout(&mut self, body: Rect, scroll: Vector2) {
        self.layout_stack.push(Layout::new(body, scroll));
    }

    pub(crate) fn layout(&self) -> Option<&Layout> {
        self.layout_stack.last()
    }

    pub(crate) fn layout_mut(&mut self) -> Option<&mut Layout> {
        self.layout_stack.last_mut()
    }

    pub fn layout_row(&mut self, widths: &[i32], height: i32) {
        if let Some(layout) = self.layout_mut() {
            layout.row(widths, height);
        }
    }

    pub fn layout_width(&mut self, width: i32) {
        if let Some(layout) = self.layout_mut() {
            layout.set_width(width);
        }
    }

    pub fn layout_height(&mut self, height: i32) {
        if let Some(layout) = self.layout_mut() {
            layout.set_height(height);
        }
    }

    /// Overrides the next cell. A relative rect is offset by the body origin,
    /// an absolute one is used as is.
    pub fn layout_set_next(&mut self, rect: Rect, relative: bool) {
        let placement = if relative {
            Placement::Relative
        } else {
            Placement::Absolute
        };
        if let Some(layout) = self.layout_mut() {
            layout.set_next(rect, placement);
        }
    }

    pub fn layout_next(&mut self) -> Rect {
        let rect = match self.layout_stack.last_mut() {
            Some(layout) => layout.next(&self.style),
            None => {
                tracing::error!("layout requested outside of any container");
                Rect::default()
            }
        };
        self.last_rect = rect;
        rect
    }

    pub fn last_rect(&self) -> Rect {
        self.last_rect
    }

    /// Lays out the widgets declared by `f` in a column occupying the next cell.
    pub fn layout_column<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let cell = self.layout_next();
        self.push_layout(cell, Vector2::ZERO);
        let res = f(self);
        if let Some(column) = self.layout_stack.pop() {
            if let Some(parent) = self.layout_mut() {
                parent.merge_column(&column);
            }
        }
        res
    }

    // drawing

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.intersect(self.clip_rect());
        if !rect.is_empty() {
            self.commands.push(Command::Rect { rect, color });
        }
    }

    /// One pixel outline just inside `rect`.
    pub fn draw_box(&mut self, rect: Rect, color: Color) {
        self.draw_rect(Rect::new(rect.x + 1, rect.y, rect.w - 2, 1), color);
        self.draw_rect(Rect::new(rect.x + 1, rect.bottom() - 1, rect.w - 2, 1), color);
        self.draw_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.draw_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.h), color);
    }

    pub fn draw_text(&mut self, text: &str, pos: Vector2, color: Color) {
        let rect = Rect::new(pos.x, pos.y, self.text_width(text), self.line_height());
        self.clipped(rect, |commands| {
            commands.push(Command::Text {
                text: text.to_owned(),
                pos,
                color,
            });
        });
    }

    pub fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color) {
        self.clipped(rect, |commands| {
            commands.push(Command::Icon { icon, rect, color });
        });
    }

    /// Queues a user callback, run on replay with `rect` and the active clip rect.
    pub fn draw_custom(&mut self, rect: Rect, callback: impl Fn(Rect, Rect) + 'static) {
        self.clipped(rect, |commands| {
            commands.push(Command::Draw {
                rect,
                callback: Box::new(callback),
            });
        });
    }

    /// Skips fully clipped content and brackets partly clipped content with clip commands.
    fn clipped(&mut self, rect: Rect, push: impl FnOnce(&mut CommandList)) {
        let clipping = self.check_clip(rect);
        if clipping == Clipping::All {
            return;
        }
        if clipping == Clipping::Part {
            let clip = self.clip_rect();
            self.set_clip(clip);
        }
        push(&mut self.commands);
        if clipping == Clipping::Part {
            self.set_clip(Rect::UNCLIPPED);
        }
    }

    pub fn draw_frame(&mut self, rect: Rect, color: ColorId) {
        self.draw_rect(rect, self.style.color(color));
        if color.is_borderless() {
            return;
        }
        let border = self.style.color(ColorId::Border);
        if border.a > 0 {
            self.draw_box(rect.expand(1), border);
        }
    }

    pub fn draw_control_frame(&mut self, id: Id, rect: Rect, color: ColorId, opt: Options) {
        if opt.contains(Options::NO_FRAME) {
            return;
        }
        let color = if self.focus == Some(id) {
            color.focused()
        } else if self.hover == Some(id) {
            color.hovered()
        } else {
            color
        };
        self.draw_frame(rect, color);
    }

    pub fn draw_control_text(&mut self, text: &str, rect: Rect, color: ColorId, opt: Options) {
        let width = self.text_width(text);
        self.push_clip_rect(rect);
        let y = rect.y + (rect.h - self.line_height()) / 2;
        let x = if opt.contains(Options::ALIGN_CENTER) {
            rect.x + (rect.w - width) / 2
        } else if opt.contains(Options::ALIGN_RIGHT) {
            rect.right() - width - self.style.padding
        } else {
            rect.x + self.style.padding
        };
        self.draw_text(text, Vector2::new(x, y), self.style.color(color));
        self.pop_clip_rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonospaceMetrics;

    fn ctx() -> Context {
        Context::new(MonospaceMetrics::default())
    }

    #[test]
    fn clip_stack_intersects() {
        let mut ctx = ctx();
        assert_eq!(ctx.clip_rect(), Rect::UNCLIPPED);
        ctx.push_clip_rect(Rect::new(0, 0, 100, 100));
        ctx.push_clip_rect(Rect::new(50, 50, 100, 100));
        assert_eq!(ctx.clip_rect(), Rect::new(50, 50, 50, 50));
        ctx.pop_clip_rect();
        ctx.pop_clip_rect();
        assert_eq!(ctx.clip_rect(), Rect::UNCLIPPED);
    }

    #[test]
    fn draw_rect_is_clipped_and_dropped_when_empty() {
        let mut ctx = ctx();
        ctx.begin_frame();
        ctx.push_clip_rect(Rect::new(0, 0, 10, 10));
        ctx.draw_rect(Rect::new(5, 5, 10, 10), Color::rgb(1, 2, 3));
        ctx.draw_rect(Rect::new(20, 20, 10, 10), Color::rgb(1, 2, 3));
        ctx.pop_clip_rect();
        ctx.end_frame();

        let rects: Vec<Rect> = ctx
            .commands()
            .filter_map(|c| match c {
                Command::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects, vec![Rect::new(5, 5, 5, 5)]);
    }

    #[test]
    fn partly_clipped_text_is_bracketed() {
        let mut ctx = ctx();
        ctx.begin_frame();
        ctx.push_clip_rect(Rect::new(0, 0, 20, 20));
        ctx.draw_text("hello", Vector2::new(0, 0), Color::rgb(0, 0, 0));
        ctx.draw_text("gone", Vector2::new(100, 100), Color::rgb(0, 0, 0));
        ctx.pop_clip_rect();
        ctx.end_frame();

        let kinds: Vec<&str> = ctx
            .commands()
            .map(|c| match c {
                Command::Clip { .. } => "clip",
                Command::Text { .. } => "text",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["clip", "text", "clip"]);
    }

    #[test]
    fn id_scopes_nest() {
        let mut ctx = ctx();
        let outer = ctx.get_id("button");
        let inner = ctx.with_id("window", |ctx| ctx.get_id("button"));
        assert_ne!(outer, inner);
        assert_eq!(ctx.last_id(), Some(inner));
        assert!(ctx.check_stacks().is_ok());
    }

    #[test]
    fn open_scopes_are_reported() {
        let mut ctx = ctx();
        ctx.begin_frame();
        ctx.push_id("leak");
        let err = ctx.check_stacks().unwrap_err();
        assert_eq!(err.type_, ErrorType::StackImbalance);
        ctx.pop_id();
        assert!(ctx.check_stacks().is_ok());
        ctx.end_frame();
    }

    #[test]
    fn layout_outside_container_is_empty() {
        let mut ctx = ctx();
        assert_eq!(ctx.layout_next(), Rect::default());
    }

    #[test]
    fn custom_draw_receives_active_clip() {
        use std::cell::Cell;
        use std::rc::Rc;

        let seen = Rc::new(Cell::new(None));
        let mut ctx = ctx();
        ctx.begin_frame();
        ctx.push_clip_rect(Rect::new(0, 0, 10, 10));
        let sink = seen.clone();
        ctx.draw_custom(Rect::new(5, 5, 10, 10), move |rect, clip| sink.set(Some((rect, clip))));
        ctx.pop_clip_rect();
        ctx.end_frame();

        struct Nop;
        impl Renderer for Nop {
            fn draw_rect(&mut self, _: Rect, _: Color) {}
            fn draw_text(&mut self, _: &str, _: Vector2, _: Color) {}
            fn draw_icon(&mut self, _: Icon, _: Rect, _: Color) {}
            fn set_clip(&mut self, _: Rect) {}
        }
        ctx.render(&mut Nop);
        assert_eq!(
            seen.get(),
            Some((Rect::new(5, 5, 10, 10), Rect::new(0, 0, 10, 10)))
        );
    }
}
