//! Hover, focus and press resolution.
//!
//! There is a single hover and a single focus per context. Hover can only be
//! gained while no mouse button is held; a press on the hovered control gives
//! it focus, and focus is kept for as long as the control keeps declaring
//! itself every frame.

use crate::context::Context;
use crate::id::Id;
use crate::math::Rect;
use crate::widgets::Options;

impl Context {
    /// Whether the innermost root container being declared is the hover root.
    pub(crate) fn in_hover_root(&self) -> bool {
        for &idx in self.container_stack.iter().rev() {
            if Some(idx) == self.hover_root {
                return true;
            }
            // only roots carry a head jump
            if self.containers[idx].head.is_some() {
                break;
            }
        }
        false
    }

    /// Mouse is inside `rect`, inside the clip rect, and over the top-most root.
    pub fn mouse_over(&self, rect: Rect) -> bool {
        let mouse = self.input.mouse_pos;
        rect.contains(mouse) && self.clip_rect().contains(mouse) && self.in_hover_root()
    }

    /// Updates hover and focus for the control `id` occupying `rect`.
    pub fn update_control(&mut self, id: Id, rect: Rect, opt: Options) {
        let mouse_over = self.mouse_over(rect);

        if self.focus == Some(id) {
            self.updated_focus = true;
        }
        if opt.contains(Options::NO_INTERACT) {
            return;
        }
        let buttons_down = !self.input.mouse_down.is_empty();
        let pressed = !self.input.mouse_pressed.is_empty();

        if mouse_over && !buttons_down {
            self.hover = Some(id);
        }

        if self.focus == Some(id) {
            if pressed && !mouse_over {
                self.set_focus(None);
            }
            if !buttons_down && !opt.contains(Options::HOLD_FOCUS) {
                self.set_focus(None);
            }
        }

        if self.hover == Some(id) {
            if pressed {
                self.set_focus(Some(id));
            } else if !mouse_over {
                self.hover = None;
            }
        }
    }

    pub fn set_focus(&mut self, id: Option<Id>) {
        self.focus = id;
        self.updated_focus = true;
    }

    pub fn focus(&self) -> Option<Id> {
        self.focus
    }

    pub fn hover(&self) -> Option<Id> {
        self.hover
    }
}
