//! Windows, panels and popups.
//!
//! Containers live in a fixed arena indexed by the container pool. Root
//! containers (windows and popups) own a head and tail jump in the command
//! list so that [`Context::end_frame`] can replay them in z-order.

use crate::context::Context;
use crate::id::Id;
use crate::input::MouseButtons;
use crate::math::{Rect, Vector2};
use crate::render_commands::Icon;
use crate::style::ColorId;
use crate::widgets::{split_label, Options, Response};

/// Smallest size a window can be resized to.
const MIN_WINDOW_SIZE: Vector2 = Vector2::new(96, 64);

#[derive(Debug, Clone, Default)]
pub(crate) struct Container {
    pub(crate) rect: Rect,
    pub(crate) body: Rect,
    pub(crate) content_size: Vector2,
    pub(crate) scroll: Vector2,
    pub(crate) zindex: i32,
    pub(crate) open: bool,
    /// Set only for root containers.
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
}

/// Geometry of a container as seen from inside its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLayout {
    pub rect: Rect,
    /// Area available to content, after title bar and scrollbars.
    pub body: Rect,
    /// Extent of the content laid out during the previous frame.
    pub content_size: Vector2,
    pub scroll: Vector2,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, v: Vector2) -> i32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    fn of_mut(self, v: &mut Vector2) -> &mut i32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }

    fn extent(self, r: Rect) -> i32 {
        match self {
            Axis::X => r.w,
            Axis::Y => r.h,
        }
    }
}

impl Context {
    /// Recalls or allocates the container for `id`.
    ///
    /// With [`Options::CLOSED`] an unknown id yields `None` and a known but
    /// closed container is not touched, so it can be evicted.
    pub(crate) fn container(&mut self, id: Id, opt: Options) -> Option<usize> {
        if let Some(idx) = self.container_pool.get(id) {
            if self.containers[idx].open || !opt.contains(Options::CLOSED) {
                self.container_pool.update(idx, self.tick);
            }
            return Some(idx);
        }
        if opt.contains(Options::CLOSED) {
            return None;
        }
        let idx = self.container_pool.init(id, self.tick);
        self.containers[idx] = Container {
            open: true,
            ..Container::default()
        };
        self.bring_to_front(idx);
        Some(idx)
    }

    pub(crate) fn bring_to_front(&mut self, idx: usize) {
        self.last_zindex += 1;
        self.containers[idx].zindex = self.last_zindex;
        tracing::debug!(container = idx, zindex = self.last_zindex, "brought to front");
    }

    fn begin_root_container(&mut self, idx: usize) {
        self.container_stack.push(idx);
        // a slot recycled within the frame replaces the root it held
        self.root_list.retain(|&root| root != idx);
        self.root_list.push(idx);
        self.containers[idx].head = Some(self.commands.push_jump());

        let cnt = &self.containers[idx];
        let above = self
            .next_hover_root
            .map_or(true, |hovered| cnt.zindex > self.containers[hovered].zindex);
        if cnt.rect.contains(self.input.mouse_pos) && above {
            self.next_hover_root = Some(idx);
        }

        // roots are never clipped by an enclosing root
        self.clip_stack.push(Rect::UNCLIPPED);
    }

    fn end_root_container(&mut self) {
        if let Some(&idx) = self.container_stack.last() {
            self.containers[idx].tail = Some(self.commands.push_jump());
            if let Some(head) = self.containers[idx].head {
                let end = self.commands.len();
                self.commands.set_jump(head, end);
            }
        }
        self.pop_clip_rect();
        self.pop_container();
    }

    fn pop_container(&mut self) {
        let Some(idx) = self.container_stack.pop() else {
            return;
        };
        if let Some(layout) = self.layout_stack.pop() {
            self.containers[idx].content_size = layout.max() - layout.body().origin();
        }
        self.pop_id();
    }

    fn push_container_body(&mut self, idx: usize, body: Rect, opt: Options) {
        let body = if opt.contains(Options::NO_SCROLL) {
            body
        } else {
            self.scrollbars(idx, body)
        };
        let scroll = self.containers[idx].scroll;
        self.push_layout(body.expand(-self.style.padding), scroll);
        self.containers[idx].body = body;
    }

    /// Content size including the body padding.
    fn padded_content(&self, idx: usize) -> Vector2 {
        let pad = self.style.padding * 2;
        self.containers[idx].content_size + Vector2::new(pad, pad)
    }

    fn scrollbars(&mut self, idx: usize, mut body: Rect) -> Rect {
        let size = self.style.scrollbar_size;
        let content = self.padded_content(idx);
        let last_body = self.containers[idx].body;
        self.push_clip_rect(body);
        if content.y > last_body.h {
            body.w -= size;
        }
        if content.x > last_body.w {
            body.h -= size;
        }
        self.scrollbar(idx, body, content, Axis::Y);
        self.scrollbar(idx, body, content, Axis::X);
        self.pop_clip_rect();
        body
    }

    fn scrollbar(&mut self, idx: usize, body: Rect, content: Vector2, axis: Axis) {
        let extent = axis.extent(body);
        let content_len = axis.of(content);
        let max_scroll = content_len - extent;
        if max_scroll <= 0 || extent <= 0 {
            *axis.of_mut(&mut self.containers[idx].scroll) = 0;
            return;
        }

        let size = self.style.scrollbar_size;
        let (base, key) = match axis {
            Axis::Y => (Rect::new(body.right(), body.y, size, body.h), "!scrollbary"),
            Axis::X => (Rect::new(body.x, body.bottom(), body.w, size), "!scrollbarx"),
        };
        let track = axis.extent(base);

        let id = self.get_id(key);
        self.update_control(id, base, Options::empty());
        let dragging = self.focus == Some(id) && self.input.mouse_down == MouseButtons::LEFT;
        let delta = axis.of(self.input.mouse_delta);
        let scroll = axis.of_mut(&mut self.containers[idx].scroll);
        if dragging {
            *scroll += delta * content_len / track;
        }
        *scroll = (*scroll).clamp(0, max_scroll);
        let position = *scroll;

        self.draw_frame(base, ColorId::ScrollBase);
        let thumb_len = self.style.thumb_size.max(track * extent / content_len);
        let offset = position * (track - thumb_len) / max_scroll;
        let thumb = match axis {
            Axis::Y => Rect::new(base.x, base.y + offset, base.w, thumb_len),
            Axis::X => Rect::new(base.x + offset, base.y, thumb_len, base.h),
        };
        self.draw_frame(thumb, ColorId::ScrollThumb);

        // wheel input goes to the hovered container
        if self.mouse_over(body) {
            self.scroll_target = Some(idx);
        }
    }

    /// Keeps the scroll offset of `idx` within its content.
    pub(crate) fn clamp_scroll(&mut self, idx: usize) {
        let content = self.padded_content(idx);
        let cnt = &mut self.containers[idx];
        cnt.scroll.x = cnt.scroll.x.clamp(0, (content.x - cnt.body.w).max(0));
        cnt.scroll.y = cnt.scroll.y.clamp(0, (content.y - cnt.body.h).max(0));
    }

    pub fn window(&mut self, title: &str, rect: Rect, f: impl FnOnce(&mut Self)) -> Response {
        self.window_opt(title, rect, Options::empty(), f)
    }

    /// Declares a window. `rect` only applies the first time the window is
    /// seen; afterwards it is moved and resized by the user.
    ///
    /// Returns [`Response::ACTIVE`] when the window is open and `f` ran.
    pub fn window_opt(
        &mut self,
        title: &str,
        rect: Rect,
        opt: Options,
        f: impl FnOnce(&mut Self),
    ) -> Response {
        let (title, key) = split_label(title);
        let id = self.get_id(key);
        let Some(idx) = self.container(id, opt) else {
            return Response::empty();
        };
        if !self.containers[idx].open {
            return Response::empty();
        }
        self.id_stack.push_id(id);

        if self.containers[idx].rect.w == 0 {
            self.containers[idx].rect = rect;
        }
        self.begin_root_container(idx);
        let rect = self.containers[idx].rect;
        let mut body = rect;

        if !opt.contains(Options::NO_FRAME) {
            self.draw_frame(rect, ColorId::WindowBg);
        }

        if !opt.contains(Options::NO_TITLE) {
            let title_rect = Rect::new(rect.x, rect.y, rect.w, self.style.title_height);
            self.draw_frame(title_rect, ColorId::TitleBg);

            let id = self.get_id("!title");
            self.update_control(id, title_rect, opt);
            self.draw_control_text(title, title_rect, ColorId::TitleText, opt);
            if self.focus == Some(id) && self.input.mouse_down == MouseButtons::LEFT {
                let moved = self.containers[idx].rect.translate(self.input.mouse_delta);
                self.containers[idx].rect = moved;
            }
            body.y += title_rect.h;
            body.h -= title_rect.h;

            if !opt.contains(Options::NO_CLOSE) {
                let id = self.get_id("!close");
                let r = Rect::new(
                    title_rect.right() - title_rect.h,
                    title_rect.y,
                    title_rect.h,
                    title_rect.h,
                );
                self.draw_icon(Icon::Close, r, self.style.color(ColorId::TitleText));
                self.update_control(id, r, opt);
                if self.input.mouse_pressed == MouseButtons::LEFT && self.focus == Some(id) {
                    self.containers[idx].open = false;
                    tracing::debug!(window = title, "closed");
                }
            }
        }

        self.push_container_body(idx, body, opt);

        if !opt.contains(Options::NO_RESIZE) {
            let size = self.style.title_height;
            let id = self.get_id("!resize");
            let r = Rect::new(rect.right() - size, rect.bottom() - size, size, size);
            self.update_control(id, r, opt);
            if self.focus == Some(id) && self.input.mouse_down == MouseButtons::LEFT {
                let delta = self.input.mouse_delta;
                let cnt = &mut self.containers[idx];
                cnt.rect.w = MIN_WINDOW_SIZE.x.max(cnt.rect.w + delta.x);
                cnt.rect.h = MIN_WINDOW_SIZE.y.max(cnt.rect.h + delta.y);
            }
        }

        if opt.contains(Options::AUTO_SIZE) {
            if let Some(layout_body) = self.layout().map(|layout| layout.body()) {
                let cnt = &mut self.containers[idx];
                cnt.rect.w = cnt.content_size.x + (cnt.rect.w - layout_body.w);
                cnt.rect.h = cnt.content_size.y + (cnt.rect.h - layout_body.h);
            }
        }

        if opt.contains(Options::POPUP)
            && !self.input.mouse_pressed.is_empty()
            && self.hover_root != Some(idx)
        {
            self.containers[idx].open = false;
            tracing::debug!(popup = title, "dismissed");
        }

        let clip = self.containers[idx].body;
        self.push_clip_rect(clip);
        f(self);
        self.pop_clip_rect();
        self.end_root_container();
        Response::ACTIVE
    }

    /// Opens the popup `name` at the mouse cursor. Declare it with [`popup`](Self::popup)
    /// in the same id scope.
    pub fn open_popup(&mut self, name: &str) {
        let (_, key) = split_label(name);
        let id = self.get_id(key);
        let Some(idx) = self.container(id, Options::empty()) else {
            return;
        };
        // pinned so the popup does not dismiss itself this frame
        self.hover_root = Some(idx);
        self.next_hover_root = Some(idx);
        let mouse = self.input.mouse_pos;
        self.containers[idx].rect = Rect::new(mouse.x, mouse.y, 1, 1);
        self.containers[idx].open = true;
        self.bring_to_front(idx);
    }

    pub fn popup(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> Response {
        let opt = Options::POPUP
            | Options::AUTO_SIZE
            | Options::NO_RESIZE
            | Options::NO_SCROLL
            | Options::NO_TITLE
            | Options::CLOSED;
        self.window_opt(name, Rect::default(), opt, f)
    }

    pub fn panel(&mut self, name: &str, f: impl FnOnce(&mut Self)) {
        self.panel_opt(name, Options::empty(), f);
    }

    /// A scrollable region occupying the next layout cell.
    pub fn panel_opt(&mut self, name: &str, opt: Options, f: impl FnOnce(&mut Self)) {
        let (_, key) = split_label(name);
        let id = self.push_id(key);
        let Some(idx) = self.container(id, opt) else {
            self.pop_id();
            return;
        };
        let rect = self.layout_next();
        self.containers[idx].rect = rect;
        if !opt.contains(Options::NO_FRAME) {
            self.draw_frame(rect, ColorId::PanelBg);
        }

        self.container_stack.push(idx);
        self.push_container_body(idx, rect, opt);
        let clip = self.containers[idx].body;
        self.push_clip_rect(clip);
        f(self);
        self.pop_clip_rect();
        self.pop_container();
    }

    /// Geometry of the innermost container being declared.
    pub fn current_container(&self) -> Option<ContainerLayout> {
        let &idx = self.container_stack.last()?;
        let cnt = &self.containers[idx];
        Some(ContainerLayout {
            rect: cnt.rect,
            body: cnt.body,
            content_size: cnt.content_size,
            scroll: cnt.scroll,
        })
    }

    /// Sets the scroll offset of the innermost container, applied from the next frame.
    pub fn set_scroll(&mut self, scroll: Vector2) {
        if let Some(&idx) = self.container_stack.last() {
            self.containers[idx].scroll = scroll;
            self.clamp_scroll(idx);
        }
    }

    /// Whether the window `name` in the current scope exists and is open.
    pub fn is_open(&mut self, name: &str) -> bool {
        let (_, key) = split_label(name);
        let id = self.get_id(key);
        self.container_pool
            .get(id)
            .is_some_and(|idx| self.containers[idx].open)
    }

    /// Opens or closes the window `name` in the current scope.
    pub fn set_open(&mut self, name: &str, open: bool) {
        let (_, key) = split_label(name);
        let id = self.get_id(key);
        let opt = if open { Options::empty() } else { Options::CLOSED };
        if let Some(idx) = self.container(id, opt) {
            self.containers[idx].open = open;
        }
    }

    /// Raises the window `name` in the current scope above every other root.
    pub fn bring_window_to_front(&mut self, name: &str) {
        let (_, key) = split_label(name);
        let id = self.get_id(key);
        if let Some(idx) = self.container_pool.get(id) {
            self.bring_to_front(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_commands::Command;
    use crate::text::MonospaceMetrics;

    fn ctx() -> Context {
        Context::new(MonospaceMetrics::default())
    }

    #[test]
    fn windows_keep_their_rect_between_frames() {
        let mut ctx = ctx();
        ctx.frame(|ctx| {
            ctx.window("demo", Rect::new(10, 10, 200, 100), |_| {});
        });
        ctx.frame(|ctx| {
            ctx.window("demo", Rect::new(50, 50, 10, 10), |ctx| {
                let cnt = ctx.current_container().unwrap();
                assert_eq!(cnt.rect, Rect::new(10, 10, 200, 100));
                assert_eq!(cnt.body, Rect::new(10, 34, 200, 76));
            });
        });
    }

    #[test]
    fn closed_windows_skip_their_body() {
        let mut ctx = ctx();
        ctx.frame(|ctx| {
            ctx.window("w", Rect::new(0, 0, 100, 100), |_| {});
            ctx.set_open("w", false);
        });
        let mut ran = false;
        ctx.frame(|ctx| {
            let res = ctx.window("w", Rect::new(0, 0, 100, 100), |_| ran = true);
            assert!(res.is_empty());
        });
        assert!(!ran);
        assert!(!ctx.is_open("w"));
    }

    fn container_of<'a>(ctx: &'a Context, name: &str) -> &'a Container {
        let idx = ctx.container_pool.get(ctx.id_stack.derive(name)).unwrap();
        &ctx.containers[idx]
    }

    /// Hovers `at` for two frames, then holds the left button down on it.
    fn press(ctx: &mut Context, at: (i32, i32), frame: &mut impl FnMut(&mut Context)) {
        ctx.input_mut().mouse_move(at.0, at.1);
        ctx.frame(&mut *frame);
        ctx.frame(&mut *frame);
        ctx.input_mut().mouse_down(at.0, at.1, MouseButtons::LEFT);
        ctx.frame(&mut *frame);
    }

    #[test]
    fn close_button_hides_the_window() {
        let mut ctx = ctx();
        let mut ran = false;
        let mut frame = |ctx: &mut Context| {
            ran = false;
            ctx.window("w", Rect::new(0, 0, 200, 100), |_| ran = true);
        };
        // the close icon fills the right end of the title bar
        press(&mut ctx, (188, 12), &mut frame);
        ctx.input_mut().mouse_up(188, 12, MouseButtons::LEFT);
        ctx.frame(&mut frame);

        assert!(!ran);
        assert!(!ctx.is_open("w"));
    }

    #[test]
    fn dragging_the_title_moves_the_window() {
        let mut ctx = ctx();
        let mut frame = |ctx: &mut Context| {
            ctx.window("w", Rect::new(0, 0, 200, 100), |_| {});
        };
        press(&mut ctx, (50, 12), &mut frame);
        assert_eq!(container_of(&ctx, "w").rect, Rect::new(0, 0, 200, 100));

        ctx.input_mut().mouse_move(70, 32);
        ctx.frame(&mut frame);
        assert_eq!(container_of(&ctx, "w").rect, Rect::new(20, 20, 200, 100));
    }

    #[test]
    fn resizing_stops_at_the_minimum_size() {
        let mut ctx = ctx();
        let mut frame = |ctx: &mut Context| {
            ctx.window("w", Rect::new(0, 0, 200, 100), |_| {});
        };
        press(&mut ctx, (188, 88), &mut frame);

        ctx.input_mut().mouse_move(168, 98);
        ctx.frame(&mut frame);
        assert_eq!(container_of(&ctx, "w").rect, Rect::new(0, 0, 180, 110));

        ctx.input_mut().mouse_move(0, 0);
        ctx.frame(&mut frame);
        assert_eq!(container_of(&ctx, "w").rect, Rect::new(0, 0, 96, 64));
    }

    #[test]
    fn dragging_the_scrollbar_scrolls_by_content_ratio() {
        let mut ctx = ctx();
        let mut frame = |ctx: &mut Context| {
            ctx.window_opt("list", Rect::new(0, 0, 200, 100), Options::NO_TITLE, |ctx| {
                for i in 0..20 {
                    ctx.label(&format!("row {i}"));
                }
            });
        };
        // the vertical track runs along the right edge, 12 px wide
        press(&mut ctx, (194, 10), &mut frame);
        assert_eq!(container_of(&ctx, "list").scroll.y, 0);

        ctx.input_mut().mouse_move(194, 30);
        ctx.frame(&mut frame);
        // 20 rows of 20 + 4 px, less the trailing gap, plus padding: 486 px over a 100 px track
        assert_eq!(container_of(&ctx, "list").scroll.y, 20 * 486 / 100);

        ctx.input_mut().mouse_move(194, 500);
        ctx.frame(&mut frame);
        assert_eq!(container_of(&ctx, "list").scroll.y, 486 - 100);
    }

    #[test]
    fn unknown_closed_container_is_not_created() {
        let mut ctx = ctx();
        ctx.frame(|ctx| {
            let res = ctx.popup("never opened", |_| panic!("popup body ran"));
            assert!(res.is_empty());
        });
        assert!(ctx.container_pool.items().iter().all(|item| item.id.is_none()));
    }

    #[test]
    fn later_windows_draw_on_top() {
        let mut ctx = ctx();
        let frame = |ctx: &mut Context| {
            ctx.window_opt("a", Rect::new(0, 0, 100, 100), Options::NO_TITLE, |ctx| {
                ctx.label("in a");
            });
            ctx.window_opt("b", Rect::new(50, 50, 100, 100), Options::NO_TITLE, |ctx| {
                ctx.label("in b");
            });
        };
        ctx.frame(frame);

        let labels = |ctx: &Context| -> Vec<String> {
            ctx.commands()
                .filter_map(|c| match c {
                    Command::Text { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(labels(&ctx), vec!["in a", "in b"]);

        // clicking inside `a` only raises it once it is the hover root
        ctx.input_mut().mouse_move(10, 10);
        ctx.frame(frame);
        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        ctx.frame(frame);
        ctx.input_mut().mouse_up(10, 10, MouseButtons::LEFT);
        ctx.frame(frame);
        assert_eq!(labels(&ctx), vec!["in b", "in a"]);
    }

    #[test]
    fn scroll_stays_within_content() {
        let mut ctx = ctx();
        let frame = |ctx: &mut Context| {
            ctx.window_opt("list", Rect::new(0, 0, 200, 100), Options::NO_TITLE, |ctx| {
                for i in 0..20 {
                    ctx.label(&format!("row {i}"));
                }
            });
        };
        ctx.input_mut().mouse_move(50, 50);
        for _ in 0..3 {
            ctx.frame(frame);
        }
        ctx.input_mut().scroll(0, 10_000);
        ctx.frame(frame);

        let idx = ctx.container_pool.get(ctx.id_stack.derive("list")).unwrap();
        let cnt = &ctx.containers[idx];
        let content_h = cnt.content_size.y + ctx.style.padding * 2;
        assert!(cnt.scroll.y > 0);
        assert_eq!(cnt.scroll.y, content_h - cnt.body.h);

        ctx.input_mut().scroll(0, -100_000);
        ctx.frame(frame);
        assert_eq!(ctx.containers[idx].scroll.y, 0);
    }

    #[test]
    fn auto_size_fits_content() {
        let mut ctx = ctx();
        let frame = |ctx: &mut Context| {
            ctx.window_opt(
                "fit",
                Rect::new(0, 0, 300, 300),
                Options::AUTO_SIZE | Options::NO_TITLE | Options::NO_SCROLL,
                |ctx| ctx.label("x"),
            );
        };
        ctx.frame(frame);
        ctx.frame(frame);
        let idx = ctx.container_pool.get(ctx.id_stack.derive("fit")).unwrap();
        // one default cell plus padding on both sides
        assert_eq!(ctx.containers[idx].rect, Rect::new(0, 0, 78 + 10, 20 + 10));
    }

    #[test]
    fn panels_nest_inside_windows() {
        let mut ctx = ctx();
        ctx.frame(|ctx| {
            ctx.window("outer", Rect::new(0, 0, 300, 300), |ctx| {
                ctx.layout_row(&[200], 100);
                ctx.panel("inner", |ctx| {
                    let cnt = ctx.current_container().unwrap();
                    assert_eq!(cnt.rect.w, 200);
                    assert_eq!(cnt.rect.h, 100);
                });
            });
        });
        assert!(ctx.check_stacks().is_ok());
    }
}
