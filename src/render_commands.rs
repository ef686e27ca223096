use std::fmt;

use crate::color::Color;
use crate::math::{Rect, Vector2};

/// Built-in glyphs the renderer is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Close,
    Check,
    Collapsed,
    Expanded,
}

/// Custom drawing hook, called during replay with the command rect and the active clip rect.
pub type DrawCallback = Box<dyn Fn(Rect, Rect)>;

/// A single entry of the deferred draw program.
pub enum Command {
    /// Fill a rectangle.
    Rect { rect: Rect, color: Color },
    /// Draw a string with its top-left corner at `pos`.
    Text {
        text: String,
        pos: Vector2,
        color: Color,
    },
    /// Draw an icon centered in `rect`.
    Icon { icon: Icon, rect: Rect, color: Color },
    /// Run a user callback.
    Draw { rect: Rect, callback: DrawCallback },
    /// Restrict subsequent commands to `rect`.
    Clip { rect: Rect },
    /// Continue replay at `dst`. `None` falls through to the next command.
    Jump { dst: Option<usize> },
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Rect { rect, color } => f
                .debug_struct("Rect")
                .field("rect", rect)
                .field("color", color)
                .finish(),
            Command::Text { text, pos, color } => f
                .debug_struct("Text")
                .field("text", text)
                .field("pos", pos)
                .field("color", color)
                .finish(),
            Command::Icon { icon, rect, color } => f
                .debug_struct("Icon")
                .field("icon", icon)
                .field("rect", rect)
                .field("color", color)
                .finish(),
            Command::Draw { rect, .. } => f.debug_struct("Draw").field("rect", rect).finish_non_exhaustive(),
            Command::Clip { rect } => f.debug_struct("Clip").field("rect", rect).finish(),
            Command::Jump { dst } => f.debug_struct("Jump").field("dst", dst).finish(),
        }
    }
}

/// How much of a rectangle survives the current clip rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clipping {
    None,
    Part,
    All,
}

impl Clipping {
    pub fn of(rect: Rect, clip: Rect) -> Clipping {
        if rect.x > clip.right()
            || rect.right() < clip.x
            || rect.y > clip.bottom()
            || rect.bottom() < clip.y
        {
            return Clipping::All;
        }
        if rect.x >= clip.x
            && rect.right() <= clip.right()
            && rect.y >= clip.y
            && rect.bottom() <= clip.bottom()
        {
            return Clipping::None;
        }
        Clipping::Part
    }
}

/// Append-only command storage for one frame.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) -> usize {
        self.commands.push(command);
        self.commands.len() - 1
    }

    /// Reserves a jump slot to be patched later with [`set_jump`](Self::set_jump).
    pub fn push_jump(&mut self) -> usize {
        self.push(Command::Jump { dst: None })
    }

    pub fn set_jump(&mut self, index: usize, target: usize) {
        match self.commands.get_mut(index) {
            Some(Command::Jump { dst }) => *dst = Some(target),
            other => debug_assert!(false, "command {index} is not a jump: {other:?}"),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// Raw storage order, jumps included.
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Replay cursor in draw order.
    pub fn iter(&self) -> Commands<'_> {
        Commands {
            list: &self.commands,
            next: 0,
            clip: Rect::UNCLIPPED,
        }
    }
}

/// Replay cursor: follows jumps, never yields them, and tracks the active clip rect.
pub struct Commands<'a> {
    list: &'a [Command],
    next: usize,
    clip: Rect,
}

impl Commands<'_> {
    /// Clip rect set by the last `Clip` command yielded.
    pub fn clip(&self) -> Rect {
        self.clip
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = &'a Command;

    fn next(&mut self) -> Option<&'a Command> {
        loop {
            let command = self.list.get(self.next)?;
            match command {
                Command::Jump { dst } => {
                    self.next = dst.unwrap_or(self.next + 1);
                }
                Command::Clip { rect } => {
                    self.clip = *rect;
                    self.next += 1;
                    return Some(command);
                }
                _ => {
                    self.next += 1;
                    return Some(command);
                }
            }
        }
    }
}

/// Rendering collaborator.
pub trait Renderer {
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, pos: Vector2, color: Color);
    fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color);
    fn set_clip(&mut self, rect: Rect);
}

/// Plays `commands` into `renderer` in draw order.
pub fn replay<R: Renderer + ?Sized>(mut commands: Commands<'_>, renderer: &mut R) {
    while let Some(command) = commands.next() {
        match command {
            Command::Rect { rect, color } => renderer.draw_rect(*rect, *color),
            Command::Text { text, pos, color } => renderer.draw_text(text, *pos, *color),
            Command::Icon { icon, rect, color } => renderer.draw_icon(*icon, *rect, *color),
            Command::Draw { rect, callback } => callback(*rect, commands.clip()),
            Command::Clip { rect } => renderer.set_clip(*rect),
            Command::Jump { .. } => {}
        }
    }
}
