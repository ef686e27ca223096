//! Buffered per-frame input.
//!
//! The host feeds platform events into [`Input`] once per frame, before any
//! widget is declared. Edge state (presses, wheel, typed text) lives for a
//! single frame and is cleared by [`Context::end_frame`](crate::Context::end_frame).

use crate::math::Vector2;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Modifier and editing keys the widgets react to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u16 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const BACKSPACE = 1 << 3;
        const RETURN = 1 << 4;
        const DELETE = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
        const HOME = 1 << 8;
        const END = 1 << 9;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    pub(crate) mouse_pos: Vector2,
    pub(crate) last_mouse_pos: Vector2,
    pub(crate) mouse_delta: Vector2,
    pub(crate) scroll_delta: Vector2,
    pub(crate) mouse_down: MouseButtons,
    pub(crate) mouse_pressed: MouseButtons,
    pub(crate) key_down: Keys,
    pub(crate) key_pressed: Keys,
    pub(crate) text: String,
}

impl Input {
    pub fn mouse_move(&mut self, x: i32, y: i32) {
        self.mouse_pos = Vector2::new(x, y);
    }

    pub fn mouse_down(&mut self, x: i32, y: i32, button: MouseButtons) {
        self.mouse_move(x, y);
        self.mouse_down |= button;
        self.mouse_pressed |= button;
    }

    pub fn mouse_up(&mut self, x: i32, y: i32, button: MouseButtons) {
        self.mouse_move(x, y);
        self.mouse_down.remove(button);
    }

    /// Accumulates wheel movement; positive `y` scrolls content up.
    pub fn scroll(&mut self, x: i32, y: i32) {
        self.scroll_delta += Vector2::new(x, y);
    }

    pub fn key_down(&mut self, key: Keys) {
        self.key_pressed |= key;
        self.key_down |= key;
    }

    pub fn key_up(&mut self, key: Keys) {
        self.key_down.remove(key);
    }

    /// Appends typed text for the focused text box.
    pub fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn mouse_pos(&self) -> Vector2 {
        self.mouse_pos
    }

    pub fn mouse_delta(&self) -> Vector2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> Vector2 {
        self.scroll_delta
    }

    pub fn buttons_down(&self) -> MouseButtons {
        self.mouse_down
    }

    pub fn buttons_pressed(&self) -> MouseButtons {
        self.mouse_pressed
    }

    pub fn keys_down(&self) -> Keys {
        self.key_down
    }

    pub fn keys_pressed(&self) -> Keys {
        self.key_pressed
    }

    pub fn typed_text(&self) -> &str {
        &self.text
    }

    pub(crate) fn begin_frame(&mut self) {
        self.mouse_delta = self.mouse_pos - self.last_mouse_pos;
    }

    pub(crate) fn end_frame(&mut self) {
        self.key_pressed = Keys::empty();
        self.mouse_pressed = MouseButtons::empty();
        self.scroll_delta = Vector2::ZERO;
        self.text.clear();
        self.last_mouse_pos = self.mouse_pos;
    }
}

/// A platform input collaborator, sampled once per frame.
pub trait InputSource {
    fn poll(&mut self, input: &mut Input);
}

impl<F: FnMut(&mut Input)> InputSource for F {
    fn poll(&mut self, input: &mut Input) {
        self(input)
    }
}
