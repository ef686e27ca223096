use crate::color::Color;
use crate::math::Vector2;

pub const DEFAULT_CONTAINER_POOL_SIZE: usize = 48;
pub const DEFAULT_TREENODE_POOL_SIZE: usize = 48;

/// Index into [`Style::colors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ColorId {
    Text,
    Border,
    WindowBg,
    TitleBg,
    TitleText,
    PanelBg,
    Button,
    ButtonHover,
    ButtonFocus,
    Base,
    BaseHover,
    BaseFocus,
    ScrollBase,
    ScrollThumb,
}

impl ColorId {
    pub const COUNT: usize = 14;

    /// The hover variant of an interactive color; other colors map to themselves.
    pub fn hovered(self) -> ColorId {
        match self {
            ColorId::Button => ColorId::ButtonHover,
            ColorId::Base => ColorId::BaseHover,
            other => other,
        }
    }

    /// The focus variant of an interactive color; other colors map to themselves.
    pub fn focused(self) -> ColorId {
        match self {
            ColorId::Button => ColorId::ButtonFocus,
            ColorId::Base => ColorId::BaseFocus,
            other => other,
        }
    }

    /// Frames drawn in these colors never get a border.
    pub(crate) fn is_borderless(self) -> bool {
        matches!(
            self,
            ColorId::ScrollBase | ColorId::ScrollThumb | ColorId::TitleBg
        )
    }
}

/// Flat metric and color table shared by every widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Default control size, before padding is added.
    pub size: Vector2,
    pub padding: i32,
    pub spacing: i32,
    pub indent: i32,
    pub title_height: i32,
    pub scrollbar_size: i32,
    pub thumb_size: i32,
    pub colors: [Color; ColorId::COUNT],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: Vector2::new(68, 10),
            padding: 5,
            spacing: 4,
            indent: 24,
            title_height: 24,
            scrollbar_size: 12,
            thumb_size: 8,
            colors: [
                Color::rgb(230, 230, 230),
                Color::rgb(25, 25, 25),
                Color::rgb(50, 50, 50),
                Color::rgb(25, 25, 25),
                Color::rgb(240, 240, 240),
                Color::TRANSPARENT,
                Color::rgb(75, 75, 75),
                Color::rgb(95, 95, 95),
                Color::rgb(115, 115, 115),
                Color::rgb(30, 30, 30),
                Color::rgb(35, 35, 35),
                Color::rgb(40, 40, 40),
                Color::rgb(43, 43, 43),
                Color::rgb(30, 30, 30),
            ],
        }
    }
}

impl Style {
    #[inline]
    pub fn color(&self, id: ColorId) -> Color {
        self.colors[id as usize]
    }

    #[inline]
    pub fn set_color(&mut self, id: ColorId, color: impl Into<Color>) -> &mut Self {
        self.colors[id as usize] = color.into();
        self
    }

    #[inline]
    pub fn padding(&mut self, padding: i32) -> &mut Self {
        self.padding = padding;
        self
    }

    #[inline]
    pub fn spacing(&mut self, spacing: i32) -> &mut Self {
        self.spacing = spacing;
        self
    }

    #[inline]
    pub fn indent(&mut self, indent: i32) -> &mut Self {
        self.indent = indent;
        self
    }

    /// Height of a row declared with height `0`.
    pub fn default_row_height(&self) -> i32 {
        self.size.y + self.padding * 2
    }

    /// Width of a control when its row declares no widths.
    pub fn default_control_width(&self) -> i32 {
        self.size.x + self.padding * 2
    }
}

/// Construction-time settings of a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of windows and panels remembered across frames.
    pub container_pool_size: usize,
    /// Number of expanded tree nodes and headers remembered across frames.
    pub treenode_pool_size: usize,
    pub style: Style,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_pool_size: DEFAULT_CONTAINER_POOL_SIZE,
            treenode_pool_size: DEFAULT_TREENODE_POOL_SIZE,
            style: Style::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn container_pool_size(&mut self, size: usize) -> &mut Self {
        self.container_pool_size = size;
        self
    }

    #[inline]
    pub fn treenode_pool_size(&mut self, size: usize) -> &mut Self {
        self.treenode_pool_size = size;
        self
    }

    #[inline]
    pub fn style(&mut self, style: Style) -> &mut Self {
        self.style = style;
        self
    }
}
