//! An immediate-mode GUI core.
//!
//! Widgets are declared every frame through a [`Context`]; there is no widget
//! tree. The context remembers only what must outlive a frame (window
//! geometry, scroll offsets, expanded tree nodes, focus) keyed by stable
//! [`Id`]s, and turns each frame's declarations into a flat command list that
//! a [`Renderer`] replays in z-order.
//!
//! ```
//! use ply_imui::prelude::*;
//!
//! let mut ctx = Context::new(MonospaceMetrics::default());
//! let mut enabled = false;
//! ctx.frame(|ctx| {
//!     ctx.window("Settings", Rect::new(10, 10, 240, 160), |ctx| {
//!         ctx.layout_row(&[80, FILL], 0);
//!         ctx.label("Enabled");
//!         ctx.checkbox("##enabled", &mut enabled);
//!     });
//! });
//! assert!(ctx.commands().count() > 0);
//! ```

pub mod color;
pub mod container;
pub mod context;
pub mod errors;
pub mod id;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod render_commands;
#[cfg(feature = "macroquad")]
pub mod renderer;
pub mod style;
pub mod text;
pub mod text_input;
pub mod widgets;

pub use crate::color::Color;
pub use crate::container::ContainerLayout;
pub use crate::context::Context;
pub use crate::errors::{Error, ErrorType};
pub use crate::id::{BindingKey, Bound, Id, IdSource};
pub use crate::input::{Input, InputSource, Keys, MouseButtons};
pub use crate::layout::{FILL, MAX_WIDTHS};
pub use crate::math::{Rect, Vector2};
pub use crate::render_commands::{Clipping, Command, CommandList, Commands, Icon, Renderer};
pub use crate::style::{ColorId, Config, Style};
pub use crate::text::{MonospaceMetrics, TextComposer, TextMetrics};
pub use crate::text_input::TextEditState;
pub use crate::widgets::{format_number, Options, Response};

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Options = Options::NO_TITLE
        .union(Options::NO_SCROLL)
        .union(Options::NO_RESIZE);

    fn ctx() -> Context {
        Context::new(MonospaceMetrics::default())
    }

    /// A plain window at the origin whose first cell is pinned to (0, 0, 100, 20).
    fn pinned(ctx: &mut Context, f: impl FnOnce(&mut Context)) {
        ctx.frame(|ctx| {
            ctx.window_opt("main", Rect::new(0, 0, 300, 300), PLAIN, |ctx| {
                ctx.layout_set_next(Rect::new(0, 0, 100, 20), false);
                f(ctx);
            });
        });
    }

    #[test]
    fn ids_are_stable_across_frames_and_scoped_by_window() {
        let mut ctx = ctx();
        let mut seen = Vec::new();
        for _ in 0..2 {
            ctx.frame(|ctx| {
                ctx.window("a", Rect::new(0, 0, 100, 100), |ctx| seen.push(ctx.get_id("ok")));
                ctx.window("b", Rect::new(0, 0, 100, 100), |ctx| seen.push(ctx.get_id("ok")));
            });
        }
        assert_eq!(seen[0], seen[2]);
        assert_eq!(seen[1], seen[3]);
        assert_ne!(seen[0], seen[1]);
    }

    #[test]
    fn a_full_frame_leaves_every_stack_empty() {
        let mut ctx = ctx();
        let mut value = 0.5;
        let mut name = String::from("x");
        ctx.frame(|ctx| {
            ctx.window("tools", Rect::new(0, 0, 300, 300), |ctx| {
                ctx.tree_node_opt("tree", Options::EXPANDED, |ctx| {
                    ctx.with_id(&3_u32, |ctx| ctx.button("b"));
                    ctx.panel("inner", |ctx| {
                        ctx.slider("v", &mut value, 0.0, 1.0, 0.0, 2);
                    });
                });
                ctx.layout_column(|ctx| ctx.textbox("name", &mut name));
                ctx.popup("unopened", |_| {});
            });
        });
        assert!(ctx.check_stacks().is_ok());
        assert!(ctx.layout_stack.is_empty());
        assert!(ctx.container_stack.is_empty());
    }

    #[test]
    fn fixed_and_fill_columns_share_a_row() {
        let mut ctx = ctx();
        let mut cells = Vec::new();
        ctx.frame(|ctx| {
            ctx.window_opt("main", Rect::new(0, 0, 300, 300), PLAIN, |ctx| {
                ctx.layout_row(&[100, FILL], 0);
                cells.push(ctx.layout_next());
                cells.push(ctx.layout_next());
            });
        });
        let spacing = ctx.style().spacing;
        assert_eq!(cells[0], Rect::new(5, 5, 100, 20));
        assert_eq!(cells[1].x, cells[0].right() + spacing);
        // body is the window inset by the padding on each side
        assert_eq!(cells[1].right(), 300 - 5);
    }

    #[test]
    fn scroll_offset_stays_within_content() {
        let mut ctx = ctx();
        let mut states = Vec::new();
        ctx.input_mut().mouse_move(50, 50);
        for delta in [0, 0, 40, 10_000, 10_000, -30, -10_000, 0] {
            ctx.input_mut().scroll(0, delta);
            ctx.frame(|ctx| {
                ctx.window_opt("list", Rect::new(0, 0, 200, 120), Options::NO_TITLE, |ctx| {
                    for i in 0..30 {
                        ctx.label(&format!("row {i}"));
                    }
                    states.extend(ctx.current_container());
                });
            });
        }
        let pad = ctx.style().padding * 2;
        for cnt in &states {
            let max = (cnt.content_size.y + pad - cnt.body.h).max(0);
            assert!((0..=max).contains(&cnt.scroll.y), "{cnt:?}");
        }
        assert!(states.iter().any(|cnt| cnt.scroll.y > 0));
        assert_eq!(states.last().map(|cnt| cnt.scroll.y), Some(0));
    }

    fn two_textboxes(ctx: &mut Context, a: &mut String, b: &mut String) -> (Option<Id>, Option<Id>) {
        let mut ids = (None, None);
        ctx.frame(|ctx| {
            ctx.window_opt("main", Rect::new(0, 0, 300, 300), PLAIN, |ctx| {
                ctx.layout_row(&[100, 100], 0);
                ctx.textbox("a", a);
                ids.0 = ctx.last_id();
                ctx.textbox("b", b);
                ids.1 = ctx.last_id();
            });
        });
        ids
    }

    #[test]
    fn only_one_control_holds_focus() {
        let mut ctx = ctx();
        let (mut a, mut b) = (String::new(), String::new());

        ctx.input_mut().mouse_move(10, 10);
        two_textboxes(&mut ctx, &mut a, &mut b);
        two_textboxes(&mut ctx, &mut a, &mut b);
        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        two_textboxes(&mut ctx, &mut a, &mut b);
        ctx.input_mut().mouse_up(10, 10, MouseButtons::LEFT);
        let (first, _) = two_textboxes(&mut ctx, &mut a, &mut b);
        assert_eq!(ctx.focus(), first);

        // hover has to move before the press can land on the other box
        ctx.input_mut().mouse_move(120, 10);
        two_textboxes(&mut ctx, &mut a, &mut b);
        ctx.input_mut().mouse_down(120, 10, MouseButtons::LEFT);
        let (first, second) = two_textboxes(&mut ctx, &mut a, &mut b);
        assert_eq!(ctx.focus(), second);
        assert_ne!(first, second);
    }

    #[test]
    fn least_recently_used_window_is_forgotten() {
        let mut config = Config::default();
        config.container_pool_size(2);
        let mut ctx = Context::with_config(config, MonospaceMetrics::default());

        ctx.frame(|ctx| {
            ctx.window("a", Rect::new(0, 0, 100, 100), |_| {});
            ctx.window("b", Rect::new(0, 0, 100, 100), |_| {});
        });
        ctx.frame(|ctx| {
            ctx.window("c", Rect::new(0, 0, 100, 100), |_| {});
        });
        assert!(!ctx.is_open("a"));
        assert!(ctx.is_open("b"));

        let mut rect = None;
        ctx.frame(|ctx| {
            ctx.window("a", Rect::new(20, 20, 150, 150), |ctx| {
                rect = ctx.current_container().map(|cnt| cnt.rect);
            });
        });
        assert_eq!(rect, Some(Rect::new(20, 20, 150, 150)));
    }

    #[test]
    fn recycling_a_root_mid_frame_keeps_replay_finite() {
        let mut config = Config::default();
        config.container_pool_size(1);
        let mut ctx = Context::with_config(config, MonospaceMetrics::default());
        ctx.frame(|ctx| {
            ctx.window("a", Rect::new(0, 0, 100, 100), |ctx| ctx.label("a"));
            ctx.window("b", Rect::new(0, 0, 100, 100), |ctx| ctx.label("b"));
        });
        assert!(ctx.commands().count() <= ctx.command_list().len());
    }

    /// Presses at x = 75 on a 100 px slider over `[0, 10]` starting at 5.
    fn drag_slider(ctx: &mut Context, step: f64) -> (f64, Response) {
        let mut value = 5.0;
        let mut res = Response::empty();
        ctx.input_mut().mouse_move(75, 10);
        pinned(ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, step, 1));
        pinned(ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, step, 1));
        assert!(res.is_empty());
        assert_eq!(value, 5.0);

        ctx.input_mut().mouse_down(75, 10, MouseButtons::LEFT);
        pinned(ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, step, 1));
        (value, res)
    }

    #[test]
    fn slider_follows_the_pointer() {
        let mut ctx = ctx();
        assert_eq!(drag_slider(&mut ctx, 0.0), (7.5, Response::CHANGE));
        assert_eq!(drag_slider(&mut Context::new(MonospaceMetrics::default()), 1.0).0, 8.0);

        // dragging past the end clamps to the range
        let mut value = 7.5;
        ctx.input_mut().mouse_move(150, 10);
        pinned(&mut ctx, |ctx| {
            ctx.slider("s", &mut value, 0.0, 10.0, 0.0, 1);
        });
        assert_eq!(value, 10.0);
    }

    #[test]
    fn typed_slider_value_is_clamped_to_the_range() {
        let mut ctx = ctx();
        let mut value = 5.0;
        let mut res = Response::empty();
        ctx.input_mut().mouse_move(10, 10);
        for _ in 0..2 {
            pinned(&mut ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, 0.0, 1));
        }

        ctx.input_mut().key_down(Keys::SHIFT);
        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, 0.0, 1));
        ctx.input_mut().key_up(Keys::SHIFT);
        ctx.input_mut().mouse_up(10, 10, MouseButtons::LEFT);
        assert!(res.is_empty());
        assert_eq!(value, 5.0);

        // clear the "5" the edit starts from
        ctx.input_mut().key_down(Keys::BACKSPACE);
        pinned(&mut ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, 0.0, 1));
        ctx.input_mut().key_up(Keys::BACKSPACE);

        ctx.input_mut().text("99");
        ctx.input_mut().key_down(Keys::RETURN);
        pinned(&mut ctx, |ctx| res = ctx.slider("s", &mut value, 0.0, 10.0, 0.0, 1));
        assert_eq!(value, 10.0);
        assert_eq!(res, Response::SUBMIT | Response::CHANGE);
        assert_eq!(ctx.focus(), None);
    }

    #[test]
    fn checkbox_toggles_once_per_click() {
        let mut ctx = ctx();
        let mut checked = false;
        let mut res = Response::empty();
        ctx.input_mut().mouse_move(10, 10);
        pinned(&mut ctx, |ctx| res = ctx.checkbox("c", &mut checked));
        pinned(&mut ctx, |ctx| res = ctx.checkbox("c", &mut checked));

        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.checkbox("c", &mut checked));
        assert!(checked);
        assert_eq!(res, Response::CHANGE);

        ctx.input_mut().mouse_up(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.checkbox("c", &mut checked));
        assert!(checked);
        assert!(res.is_empty());

        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.checkbox("c", &mut checked));
        assert!(!checked);
    }

    #[test]
    fn popup_closes_on_a_press_elsewhere() {
        let mut ctx = ctx();
        let mut open = true;
        let mut ran = false;
        let mut frame = |ctx: &mut Context| {
            ran = false;
            ctx.frame(|ctx| {
                ctx.window_opt("main", Rect::new(0, 0, 300, 300), PLAIN, |ctx| {
                    if std::mem::take(&mut open) {
                        ctx.open_popup("menu");
                    }
                    ctx.popup("menu", |ctx| {
                        ran = true;
                        ctx.label("item");
                    });
                });
            });
            ran
        };

        ctx.input_mut().mouse_move(10, 10);
        assert!(frame(&mut ctx));
        assert!(frame(&mut ctx));

        ctx.input_mut().mouse_move(290, 290);
        assert!(frame(&mut ctx));
        ctx.input_mut().mouse_down(290, 290, MouseButtons::LEFT);
        frame(&mut ctx);
        ctx.input_mut().mouse_up(290, 290, MouseButtons::LEFT);
        assert!(!frame(&mut ctx));
    }

    #[test]
    fn idle_textbox_leaves_its_buffer_alone() {
        let mut ctx = ctx();
        let mut buf = String::from("hello");
        let mut res = Response::empty();
        ctx.input_mut().mouse_move(10, 10);
        for _ in 0..2 {
            pinned(&mut ctx, |ctx| res = ctx.textbox("t", &mut buf));
            assert!(res.is_empty());
        }
        ctx.input_mut().mouse_down(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.textbox("t", &mut buf));
        ctx.input_mut().mouse_up(10, 10, MouseButtons::LEFT);
        pinned(&mut ctx, |ctx| res = ctx.textbox("t", &mut buf));

        assert!(ctx.focus().is_some());
        assert!(res.is_empty());
        assert_eq!(buf, "hello");
    }
}
