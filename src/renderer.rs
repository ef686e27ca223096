//! macroquad backend: draws replayed commands, measures text with macroquad
//! fonts and turns macroquad's polled input into [`Input`] events.

use macroquad::prelude::*;

use crate::input::{Input, InputSource, Keys, MouseButtons};
use crate::render_commands::{Icon, Renderer};
use crate::text::TextMetrics;

/// Pixels scrolled per wheel notch.
const WHEEL_STEP: f32 = 30.0;

fn ui_to_macroquad_color(color: crate::color::Color) -> Color {
    let [r, g, b, a] = color.to_f32();
    Color { r, g, b, a }
}

/// Font shared by [`MacroquadRenderer`] and [`MacroquadMetrics`].
/// `None` uses macroquad's built-in font.
#[derive(Clone)]
pub struct FontSpec {
    pub font: Option<Font>,
    pub size: u16,
}

impl FontSpec {
    pub fn new(font: Option<Font>, size: u16) -> Self {
        Self { font, size }
    }

    /// Distance from the top of a line to its baseline.
    fn ascent(&self) -> f32 {
        measure_text("Mg", self.font.as_ref(), self.size, 1.0).offset_y
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(None, 16)
    }
}

pub struct MacroquadMetrics {
    font: FontSpec,
    line_height: i32,
}

impl MacroquadMetrics {
    pub fn new(font: FontSpec) -> Self {
        let line_height = measure_text("Mg", font.font.as_ref(), font.size, 1.0)
            .height
            .ceil() as i32;
        Self {
            line_height: line_height.max(font.size as i32),
            font,
        }
    }
}

impl TextMetrics for MacroquadMetrics {
    fn text_width(&self, text: &str) -> i32 {
        measure_text(text, self.font.font.as_ref(), self.font.size, 1.0)
            .width
            .ceil() as i32
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

pub struct MacroquadRenderer {
    font: FontSpec,
    ascent: f32,
}

impl MacroquadRenderer {
    pub fn new(font: FontSpec) -> Self {
        Self {
            ascent: font.ascent(),
            font,
        }
    }
}

impl Default for MacroquadRenderer {
    fn default() -> Self {
        Self::new(FontSpec::default())
    }
}

impl Renderer for MacroquadRenderer {
    fn draw_rect(&mut self, rect: crate::math::Rect, color: crate::color::Color) {
        draw_rectangle(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32,
            rect.h as f32,
            ui_to_macroquad_color(color),
        );
    }

    fn draw_text(&mut self, text: &str, pos: crate::math::Vector2, color: crate::color::Color) {
        draw_text_ex(
            text,
            pos.x as f32,
            pos.y as f32 + self.ascent,
            TextParams {
                font_size: self.font.size,
                font: self.font.font.as_ref(),
                font_scale: 1.0,
                font_scale_aspect: 1.0,
                rotation: 0.0,
                color: ui_to_macroquad_color(color),
            },
        );
    }

    fn draw_icon(&mut self, icon: Icon, rect: crate::math::Rect, color: crate::color::Color) {
        let color = ui_to_macroquad_color(color);
        let cx = rect.x as f32 + rect.w as f32 / 2.0;
        let cy = rect.y as f32 + rect.h as f32 / 2.0;
        let r = (rect.w.min(rect.h) as f32 / 4.0).max(2.0);
        match icon {
            Icon::Close => {
                draw_line(cx - r, cy - r, cx + r, cy + r, 2.0, color);
                draw_line(cx - r, cy + r, cx + r, cy - r, 2.0, color);
            }
            Icon::Check => {
                draw_rectangle(cx - r, cy - r, r * 2.0, r * 2.0, color);
            }
            Icon::Collapsed => draw_triangle(
                vec2(cx - r / 2.0, cy - r),
                vec2(cx - r / 2.0, cy + r),
                vec2(cx + r, cy),
                color,
            ),
            Icon::Expanded => draw_triangle(
                vec2(cx - r, cy - r / 2.0),
                vec2(cx + r, cy - r / 2.0),
                vec2(cx, cy + r),
                color,
            ),
        }
    }

    fn set_clip(&mut self, rect: crate::math::Rect) {
        let clip = (rect != crate::math::Rect::UNCLIPPED).then_some((rect.x, rect.y, rect.w, rect.h));
        unsafe {
            get_internal_gl().quad_gl.scissor(clip);
        }
    }
}

const KEY_MAP: &[(KeyCode, Keys)] = &[
    (KeyCode::LeftShift, Keys::SHIFT),
    (KeyCode::RightShift, Keys::SHIFT),
    (KeyCode::LeftControl, Keys::CTRL),
    (KeyCode::RightControl, Keys::CTRL),
    (KeyCode::LeftAlt, Keys::ALT),
    (KeyCode::RightAlt, Keys::ALT),
    (KeyCode::Backspace, Keys::BACKSPACE),
    (KeyCode::Enter, Keys::RETURN),
    (KeyCode::KpEnter, Keys::RETURN),
    (KeyCode::Delete, Keys::DELETE),
    (KeyCode::Left, Keys::LEFT),
    (KeyCode::Right, Keys::RIGHT),
    (KeyCode::Home, Keys::HOME),
    (KeyCode::End, Keys::END),
];

const BUTTON_MAP: &[(MouseButton, MouseButtons)] = &[
    (MouseButton::Left, MouseButtons::LEFT),
    (MouseButton::Right, MouseButtons::RIGHT),
    (MouseButton::Middle, MouseButtons::MIDDLE),
];

/// Wheel magnitude differs between platforms, so only the direction is kept.
fn wheel_notches(delta: f32) -> i32 {
    if delta == 0.0 {
        0
    } else {
        (delta.signum() * -WHEEL_STEP) as i32
    }
}

/// Reads macroquad's input state once per frame.
#[derive(Debug, Default)]
pub struct MacroquadInput;

impl InputSource for MacroquadInput {
    fn poll(&mut self, input: &mut Input) {
        let (mx, my) = mouse_position();
        let (x, y) = (mx as i32, my as i32);
        input.mouse_move(x, y);

        for &(button, flag) in BUTTON_MAP {
            if is_mouse_button_pressed(button) {
                input.mouse_down(x, y, flag);
            }
            if is_mouse_button_released(button) {
                input.mouse_up(x, y, flag);
            }
        }

        // macroquad reports positive y when the wheel moves away from the user
        let (wx, wy) = mouse_wheel();
        if wx != 0.0 || wy != 0.0 {
            input.scroll(wheel_notches(wx), wheel_notches(wy));
        }

        for &(key, flag) in KEY_MAP {
            if is_key_pressed(key) {
                input.key_down(flag);
            }
            if is_key_released(key) {
                input.key_up(flag);
            }
        }

        let mut typed = String::new();
        while let Some(c) = get_char_pressed() {
            if !c.is_control() {
                typed.push(c);
            }
        }
        if !typed.is_empty() {
            input.text(&typed);
        }
    }
}
