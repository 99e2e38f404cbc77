//! The display surface the machine prints to.
//!
//! The engine only ever talks to a display through [`DisplaySurface`]:
//! - `reinitialize` when the program changes resolution
//! - `render_text` when the program prints a string
//! - `poll_quit` once per step
//! - `release` once, when the machine halts
//!
//! All resolution, cursor and wrapping state lives behind the trait, in
//! the surface itself.

mod console;
mod recording;
mod surface;

pub use console::ConsoleDisplay;
pub use recording::{DisplayEvent, RecordingDisplay};
pub use surface::{DrawnLine, TextSurface, GLYPH_WIDTH, LINE_HEIGHT, MARGIN};

use std::fmt;
use serde::{Serialize, Deserialize};

/// Display size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Resolution used at startup and whenever a request is invalid.
    pub const DEFAULT: Self = Self { width: 640, height: 480 };
    /// Largest resolution a program may request.
    pub const MAX: Self = Self { width: 1920, height: 1080 };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the resolution is within 1x1 ..= 1920x1080.
    pub const fn is_valid(self) -> bool {
        self.width > 0
            && self.width <= Self::MAX.width
            && self.height > 0
            && self.height <= Self::MAX.height
    }

    /// The requested resolution, or [`Resolution::DEFAULT`] if it is invalid.
    pub const fn validated(width: u32, height: u32) -> Self {
        let requested = Self::new(width, height);
        if requested.is_valid() {
            requested
        } else {
            Self::DEFAULT
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Capability interface the engine uses to reach the outside world.
///
/// Every call is synchronous and must not block.
pub trait DisplaySurface {
    /// Switch to `resolution`, clearing the surface and resetting the cursor.
    fn reinitialize(&mut self, resolution: Resolution);

    /// Draw `text` at the cursor, word-wrapped to the surface width.
    fn render_text(&mut self, text: &str);

    /// Whether the user asked to stop the machine.
    fn poll_quit(&mut self) -> bool;

    /// Give back any resources held by the surface.
    fn release(&mut self) {}
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Box<D> {
    fn reinitialize(&mut self, resolution: Resolution) {
        (**self).reinitialize(resolution)
    }

    fn render_text(&mut self, text: &str) {
        (**self).render_text(text)
    }

    fn poll_quit(&mut self) -> bool {
        (**self).poll_quit()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
