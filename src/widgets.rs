//! Built-in controls.
//!
//! Labels may carry an explicit key after `##`: `"Save##toolbar"` draws
//! "Save" but is identified by "toolbar". Without a key the whole label is
//! used.

use crate::context::Context;
use crate::errors::{Error, ErrorType};
use crate::id::{Id, IdSource};
use crate::input::{Keys, MouseButtons};
use crate::layout::FILL;
use crate::math::{Rect, Vector2};
use crate::render_commands::Icon;
use crate::style::ColorId;
use crate::text::wrap_lines;
use crate::text_input::TextEditState;

bitflags::bitflags! {
    /// What happened to a control this frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Response: u8 {
        /// Expanded or open.
        const ACTIVE = 1 << 0;
        /// Clicked or committed.
        const SUBMIT = 1 << 1;
        /// The bound value was modified.
        const CHANGE = 1 << 2;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Options: u16 {
        const ALIGN_CENTER = 1 << 0;
        const ALIGN_RIGHT = 1 << 1;
        const NO_INTERACT = 1 << 2;
        const NO_FRAME = 1 << 3;
        const NO_RESIZE = 1 << 4;
        const NO_SCROLL = 1 << 5;
        const NO_CLOSE = 1 << 6;
        const NO_TITLE = 1 << 7;
        /// Keep focus after the mouse is released, until a click elsewhere.
        const HOLD_FOCUS = 1 << 8;
        const AUTO_SIZE = 1 << 9;
        const POPUP = 1 << 10;
        /// Do not create the container if it does not exist yet.
        const CLOSED = 1 << 11;
        /// Headers and tree nodes start expanded.
        const EXPANDED = 1 << 12;
    }
}

const LABEL_KEY_SEPARATOR: &str = "##";

/// Splits `label` into the text to draw and the key to identify it by.
pub(crate) fn split_label(label: &str) -> (&str, &str) {
    match label.split_once(LABEL_KEY_SEPARATOR) {
        Some((text, key)) if !key.is_empty() => (text, key),
        Some((text, _)) => (text, text),
        None => (label, label),
    }
}

/// Formats `value` with a fixed number of decimals.
pub fn format_number(value: f64, digits: usize) -> String {
    format!("{value:.digits$}")
}

/// Text a number edit starts from: at least three decimals, trailing zeros dropped.
fn edit_seed(value: f64, digits: usize) -> String {
    let text = format_number(value, digits.max(3));
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    }
}

impl Context {
    /// A single line of text in the next cell.
    pub fn label(&mut self, text: &str) {
        let r = self.layout_next();
        self.draw_control_text(text, r, ColorId::Text, Options::empty());
    }

    /// Word-wrapped text spanning the width of the container.
    pub fn text(&mut self, text: &str) {
        let color = self.style.color(ColorId::Text);
        let line_height = self.line_height();
        self.layout_column(|ctx| {
            ctx.layout_row(&[FILL], line_height);
            let first = ctx.layout_next();
            let lines = wrap_lines(text, first.w, &*ctx.metrics);
            for (i, line) in lines.into_iter().enumerate() {
                let r = if i == 0 { first } else { ctx.layout_next() };
                ctx.draw_text(&text[line], r.origin(), color);
            }
        });
    }

    pub fn button(&mut self, label: &str) -> Response {
        self.button_opt(label, None, Options::ALIGN_CENTER)
    }

    /// A button showing only `icon`. `key` tells apart buttons sharing an icon.
    pub fn icon_button<K: IdSource + ?Sized>(&mut self, key: &K, icon: Icon) -> Response {
        self.with_id(key, |ctx| ctx.button_opt("", Some(icon), Options::ALIGN_CENTER))
    }

    /// Returns [`Response::SUBMIT`] on the frame the button is pressed.
    ///
    /// A button with neither a key nor an icon has no id and never reacts.
    pub fn button_opt(&mut self, label: &str, icon: Option<Icon>, opt: Options) -> Response {
        let (text, key) = split_label(label);
        let id = match icon {
            _ if !key.is_empty() => Some(self.get_id(key)),
            Some(icon) => Some(self.get_id(&(icon as u32))),
            None => None,
        };
        let r = self.layout_next();

        let mut res = Response::empty();
        match id {
            Some(id) => {
                self.update_control(id, r, opt);
                if self.input.mouse_pressed == MouseButtons::LEFT && self.focus == Some(id) {
                    res |= Response::SUBMIT;
                }
                self.draw_control_frame(id, r, ColorId::Button, opt);
            }
            None if !opt.contains(Options::NO_FRAME) => self.draw_frame(r, ColorId::Button),
            None => {}
        }
        if !text.is_empty() {
            self.draw_control_text(text, r, ColorId::Text, opt);
        }
        if let Some(icon) = icon {
            self.draw_icon(icon, r, self.style.color(ColorId::Text));
        }
        res
    }

    pub fn checkbox(&mut self, label: &str, state: &mut bool) -> Response {
        let (text, key) = split_label(label);
        let id = self.get_id(key);
        let r = self.layout_next();
        let check = Rect::new(r.x, r.y, r.h, r.h);
        self.update_control(id, r, Options::empty());

        let mut res = Response::empty();
        if self.input.mouse_pressed == MouseButtons::LEFT && self.focus == Some(id) {
            res |= Response::CHANGE;
            *state = !*state;
        }

        self.draw_control_frame(id, check, ColorId::Base, Options::empty());
        if *state {
            self.draw_icon(Icon::Check, check, self.style.color(ColorId::Text));
        }
        let r = Rect::new(r.x + check.w, r.y, r.w - check.w, r.h);
        self.draw_control_text(text, r, ColorId::Text, Options::empty());
        res
    }

    pub fn slider<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        value: &mut f64,
        low: f64,
        high: f64,
        step: f64,
        digits: usize,
    ) -> Response {
        self.slider_opt(key, value, low, high, step, digits, Options::ALIGN_CENTER)
    }

    /// Drags `value` within `[low, high]`. A non-zero `step` snaps to the
    /// nearest multiple. Shift-click to type a value.
    #[allow(clippy::too_many_arguments)]
    pub fn slider_opt<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        value: &mut f64,
        low: f64,
        high: f64,
        step: f64,
        digits: usize,
        opt: Options,
    ) -> Response {
        let last = *value;
        let id = self.push_id(key);

        let mut typed = last;
        if let Some(res) = self.number_textbox(&mut typed, id, digits) {
            self.pop_id();
            if res.contains(Response::SUBMIT) {
                *value = clamp(typed, low, high);
            }
            return if *value != last {
                res | Response::CHANGE
            } else {
                res - Response::CHANGE
            };
        }

        let r = self.layout_next();
        self.update_control(id, r, opt);

        let mut v = last;
        if self.focus == Some(id)
            && r.w > 0
            && (self.input.mouse_down | self.input.mouse_pressed) == MouseButtons::LEFT
        {
            v = low + (self.input.mouse_pos.x - r.x) as f64 * (high - low) / r.w as f64;
            if step != 0.0 {
                v = (v / step).round() * step;
            }
        }
        *value = clamp(v, low, high);
        let v = *value;

        let mut res = Response::empty();
        if v != last {
            res |= Response::CHANGE;
        }

        self.draw_control_frame(id, r, ColorId::Base, opt);
        let w = self.style.thumb_size;
        let x = ((v - low) * (r.w - w) as f64 / (high - low)) as i32;
        let thumb = Rect::new(r.x + x, r.y, w, r.h);
        self.draw_control_frame(id, thumb, ColorId::Button, opt);
        let text = format_number(v, digits);
        self.draw_control_text(&text, r, ColorId::Text, opt);

        self.pop_id();
        res
    }

    pub fn number<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        value: &mut f64,
        step: f64,
        digits: usize,
    ) -> Response {
        self.number_opt(key, value, step, digits, Options::ALIGN_CENTER)
    }

    /// A number changed by dragging horizontally, `step` per pixel.
    /// Shift-click to type a value.
    pub fn number_opt<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        value: &mut f64,
        step: f64,
        digits: usize,
        opt: Options,
    ) -> Response {
        let id = self.push_id(key);
        let last = *value;

        if let Some(res) = self.number_textbox(value, id, digits) {
            self.pop_id();
            return res;
        }

        let r = self.layout_next();
        self.update_control(id, r, opt);
        if self.focus == Some(id) && self.input.mouse_down == MouseButtons::LEFT {
            *value += self.input.mouse_delta.x as f64 * step;
        }

        let mut res = Response::empty();
        if *value != last {
            res |= Response::CHANGE;
        }

        self.draw_control_frame(id, r, ColorId::Base, opt);
        let text = format_number(*value, digits);
        self.draw_control_text(&text, r, ColorId::Text, opt);

        self.pop_id();
        res
    }

    /// Text entry mode shared by sliders and numbers. `None` when not editing.
    fn number_textbox(&mut self, value: &mut f64, id: Id, digits: usize) -> Option<Response> {
        if self.input.mouse_pressed == MouseButtons::LEFT
            && self.input.key_down.contains(Keys::SHIFT)
            && self.hover == Some(id)
        {
            self.number_edit = Some(id);
            self.number_edit_buf = edit_seed(*value, digits);
            self.text_edits.remove(&id);
        }
        if self.number_edit != Some(id) {
            return None;
        }

        let mut buf = std::mem::take(&mut self.number_edit_buf);
        let res = self.textbox_raw(&mut buf, id, Options::empty());
        self.number_edit_buf = buf;

        if !res.contains(Response::SUBMIT) && self.focus == Some(id) {
            return Some(Response::empty());
        }
        let parsed = match self.number_edit_buf.trim().parse::<f64>() {
            Ok(parsed) => parsed,
            Err(err) => {
                let err = Error::new(
                    ErrorType::InvalidNumber,
                    format!("{:?}: {err}", self.number_edit_buf),
                );
                tracing::warn!(%err, "falling back to zero");
                0.0
            }
        };
        self.number_edit = None;
        self.text_edits.remove(&id);

        let mut res = Response::SUBMIT;
        if parsed != *value {
            res |= Response::CHANGE;
        }
        *value = parsed;
        Some(res)
    }

    pub fn textbox<K: IdSource + ?Sized>(&mut self, key: &K, buf: &mut String) -> Response {
        self.textbox_opt(key, buf, Options::empty())
    }

    /// Single-line text entry. Returns [`Response::SUBMIT`] when Enter is pressed.
    pub fn textbox_opt<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        buf: &mut String,
        opt: Options,
    ) -> Response {
        let id = self.push_id(key);
        let res = self.textbox_raw(buf, id, opt);
        self.pop_id();
        res
    }

    fn textbox_raw(&mut self, buf: &mut String, id: Id, opt: Options) -> Response {
        let opt = opt | Options::HOLD_FOCUS;
        let r = self.layout_next();
        self.update_control(id, r, opt);

        let mut res = Response::empty();
        if self.focus == Some(id) {
            let mut state = self.text_edits.remove(&id).unwrap_or_default();
            if state.text != *buf {
                state.set_text(buf);
            }
            res |= self.edit_text(id, r, &mut state);
            if state.text != *buf {
                buf.clear();
                buf.push_str(&state.text);
                res |= Response::CHANGE;
            }
            self.text_edits.insert(id, state);
        }

        self.draw_control_frame(id, r, ColorId::Base, opt);
        if self.focus == Some(id) {
            self.draw_edited_text(id, buf, r);
        } else {
            self.draw_control_text(buf, r, ColorId::Text, opt);
        }
        res
    }

    /// Applies this frame's typed text and editing keys to `state`.
    fn edit_text(&mut self, id: Id, r: Rect, state: &mut TextEditState) -> Response {
        let caret = Vector2::new(
            r.x + self.style.padding + self.text_width(state.before_cursor()),
            r.y + self.line_height(),
        );
        if let Some(composer) = self.composer.as_mut() {
            match composer.compose(id, caret, state) {
                Ok(true) => return Response::empty(),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%err, "text composition failed, input skipped");
                    return Response::empty();
                }
            }
        }

        if !self.input.text.is_empty() {
            state.insert_text(&self.input.text);
        }
        let keys = self.input.key_pressed;
        let shift = self.input.key_down.contains(Keys::SHIFT);
        if keys.contains(Keys::BACKSPACE) {
            state.backspace();
        }
        if keys.contains(Keys::DELETE) {
            state.delete_forward();
        }
        if keys.contains(Keys::LEFT) {
            state.move_left(shift);
        }
        if keys.contains(Keys::RIGHT) {
            state.move_right(shift);
        }
        if keys.contains(Keys::HOME) {
            state.move_home(shift);
        }
        if keys.contains(Keys::END) {
            state.move_end(shift);
        }
        if keys.contains(Keys::RETURN) {
            self.set_focus(None);
            return Response::SUBMIT;
        }
        Response::empty()
    }

    /// Text of a focused box, scrolled so the end stays visible, with selection and caret.
    fn draw_edited_text(&mut self, id: Id, text: &str, r: Rect) {
        let color = self.style.color(ColorId::Text);
        let text_w = self.text_width(text);
        let text_h = self.line_height();
        let overflow = r.w - self.style.padding - text_w - 1;
        let x = r.x + overflow.min(self.style.padding);
        let y = r.y + (r.h - text_h) / 2;

        let (caret, selection) = match self.text_edits.get(&id) {
            Some(state) => {
                let caret = self.text_width(state.before_cursor());
                let selection = state.selection_range().map(|(start, end)| {
                    let before = crate::text_input::char_index_to_byte(&state.text, start);
                    let after = crate::text_input::char_index_to_byte(&state.text, end);
                    let from = self.text_width(&state.text[..before]);
                    (from, self.text_width(&state.text[before..after]))
                });
                (caret, selection)
            }
            None => (text_w, None),
        };

        self.push_clip_rect(r);
        if let Some((from, width)) = selection {
            let highlight = self.style.color(ColorId::ButtonFocus);
            self.draw_rect(Rect::new(x + from, y, width, text_h), highlight);
        }
        self.draw_text(text, Vector2::new(x, y), color);
        self.draw_rect(Rect::new(x + caret, y, 1, text_h), color);
        self.pop_clip_rect();
    }

    pub fn header(&mut self, label: &str, expanded: bool) -> Response {
        let opt = if expanded {
            Options::EXPANDED
        } else {
            Options::empty()
        };
        self.header_opt(label, opt)
    }

    /// A collapsible section header. Returns [`Response::ACTIVE`] while expanded.
    pub fn header_opt(&mut self, label: &str, opt: Options) -> Response {
        self.header_raw(label, false, opt).0
    }

    fn header_raw(&mut self, label: &str, tree_node: bool, opt: Options) -> (Response, Id) {
        let (text, key) = split_label(label);
        let id = self.get_id(key);
        let slot = self.treenode_pool.get(id);
        self.layout_row(&[FILL], 0);

        let mut active = slot.is_some();
        let expanded = if opt.contains(Options::EXPANDED) {
            !active
        } else {
            active
        };

        let mut r = self.layout_next();
        self.update_control(id, r, Options::empty());
        if self.input.mouse_pressed == MouseButtons::LEFT && self.focus == Some(id) {
            active = !active;
        }

        match slot {
            Some(slot) if active => self.treenode_pool.update(slot, self.tick),
            Some(slot) => self.treenode_pool.clear(slot),
            None if active => {
                self.treenode_pool.init(id, self.tick);
            }
            None => {}
        }

        if tree_node {
            if self.hover == Some(id) {
                self.draw_frame(r, ColorId::ButtonHover);
            }
        } else {
            self.draw_control_frame(id, r, ColorId::Button, Options::empty());
        }
        let icon = if expanded {
            Icon::Expanded
        } else {
            Icon::Collapsed
        };
        self.draw_icon(
            icon,
            Rect::new(r.x, r.y, r.h, r.h),
            self.style.color(ColorId::Text),
        );
        let shift = r.h - self.style.padding;
        r.x += shift;
        r.w -= shift;
        self.draw_control_text(text, r, ColorId::Text, Options::empty());

        let res = if expanded {
            Response::ACTIVE
        } else {
            Response::empty()
        };
        (res, id)
    }

    pub fn tree_node(&mut self, label: &str, f: impl FnOnce(&mut Self)) -> Response {
        self.tree_node_opt(label, Options::empty(), f)
    }

    /// A header whose children are indented and scoped under its id.
    pub fn tree_node_opt(&mut self, label: &str, opt: Options, f: impl FnOnce(&mut Self)) -> Response {
        let (res, id) = self.header_raw(label, true, opt);
        if !res.contains(Response::ACTIVE) {
            return res;
        }
        let indent = self.style.indent;
        if let Some(layout) = self.layout_mut() {
            layout.add_indent(indent);
        }
        self.id_stack.push_id(id);
        f(self);
        self.pop_id();
        if let Some(layout) = self.layout_mut() {
            layout.add_indent(-indent);
        }
        res
    }

    /// A custom control: takes the next cell, resolves interaction, then lets
    /// `f` draw it. `f` runs inside the control's id scope.
    pub fn control<K: IdSource + ?Sized>(
        &mut self,
        key: &K,
        f: impl FnOnce(&mut Self, Rect) -> Response,
    ) -> Response {
        let id = self.push_id(key);
        let r = self.layout_next();
        self.update_control(id, r, Options::empty());
        let res = f(self, r);
        self.pop_id();
        res
    }

    /// Consumes the next cell without drawing anything.
    pub fn placeholder(&mut self) {
        self.layout_next();
    }
}

fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}
