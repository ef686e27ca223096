//! A single import for declaring UIs.
//!
//! ```rust
//! use ply_imui::prelude::*;
//! ```

// Core types
pub use crate::context::Context;
pub use crate::container::ContainerLayout;
pub use crate::id::{BindingKey, Bound, Id, IdSource};
pub use crate::input::{Input, InputSource, Keys, MouseButtons};
pub use crate::layout::FILL;
pub use crate::render_commands::{Command, Icon, Renderer};
pub use crate::style::{ColorId, Config, Style};
pub use crate::text::{MonospaceMetrics, TextComposer, TextMetrics};
pub use crate::widgets::{Options, Response};

// macroquad backend — feature-gated
#[cfg(feature = "macroquad")]
pub use crate::renderer::{FontSpec, MacroquadInput, MacroquadMetrics, MacroquadRenderer};

// Full macroquad prelude, with Color, Rect and the vector type shadowed by ours
#[cfg(feature = "macroquad")]
pub use macroquad::prelude::*;
pub use crate::color::Color;
pub use crate::math::{Rect, Vector2};
// Explicit aliases for when users need macroquad's versions
#[cfg(feature = "macroquad")]
pub use macroquad::prelude::{Color as MacroquadColor, Rect as MacroquadRect};
