//! Text layout on a pixel surface.
//!
//! Shared by every display implementation so that wrapping, cursor movement
//! and overflow clearing behave the same headless and in the terminal.
//! Text is laid out in a fixed monospace cell of [`GLYPH_WIDTH`] x
//! [`LINE_HEIGHT`] pixels, inset by [`MARGIN`] on every side.

use super::Resolution;
use serde::{Serialize, Deserialize};

/// Inset from the surface edges, in pixels.
pub const MARGIN: u32 = 10;
/// Advance of one character, in pixels.
pub const GLYPH_WIDTH: u32 = 14;
/// Height of one line of text, in pixels.
pub const LINE_HEIGHT: u32 = 24;

/// A line of text drawn at a pixel position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnLine {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// The visible contents of a display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSurface {
    resolution: Resolution,
    cursor: (u32, u32),
    lines: Vec<DrawnLine>,
    /// Number of times the surface was cleared because text overflowed.
    overflow_clears: u64,
}

impl TextSurface {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            cursor: (MARGIN, MARGIN),
            lines: Vec::new(),
            overflow_clears: 0,
        }
    }

    /// Change resolution, clear the surface and reset the cursor.
    pub fn reinitialize(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.clear();
    }

    /// Clear the surface and move the cursor to the top-left margin.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.cursor = (MARGIN, MARGIN);
    }

    /// Split `text` into lines that fit the usable width.
    ///
    /// Words are separated by single spaces. A word that does not fit on the
    /// current line starts a new one; a word wider than the surface gets a
    /// line of its own.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let max_width = self.resolution.width.saturating_sub(2 * MARGIN);
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split(' ') {
            let candidate = current.chars().count() + word.chars().count() + 1;
            if current.is_empty() || text_width(candidate) <= max_width {
                current.push_str(word);
                current.push(' ');
            } else {
                lines.push(current.trim_end().to_string());
                current = format!("{} ", word);
            }
        }
        lines.push(current.trim_end().to_string());

        lines
    }

    /// Draw `text` at the cursor and return the lines that were drawn.
    ///
    /// When a line would cross the bottom edge the surface is cleared and
    /// drawing resumes at the top.
    pub fn render(&mut self, text: &str) -> Vec<String> {
        let wrapped = self.wrap(text);

        for line in &wrapped {
            if self.cursor.1 > MARGIN && self.cursor.1 + LINE_HEIGHT > self.resolution.height {
                self.clear();
                self.overflow_clears += 1;
            }

            let (x, y) = self.cursor;
            self.lines.push(DrawnLine { x, y, text: line.clone() });
            self.cursor = (x, y + LINE_HEIGHT);
        }

        wrapped
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn cursor(&self) -> (u32, u32) {
        self.cursor
    }

    /// Lines currently visible, top to bottom.
    pub fn lines(&self) -> &[DrawnLine] {
        &self.lines
    }

    pub fn overflow_clears(&self) -> u64 {
        self.overflow_clears
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new(Resolution::DEFAULT)
    }
}

fn text_width(chars: usize) -> u32 {
    (chars as u32).saturating_mul(GLYPH_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        let mut surface = TextSurface::default();
        let drawn = surface.render("hello world");
        assert_eq!(drawn, vec!["hello world"]);
        assert_eq!(surface.cursor(), (MARGIN, MARGIN + LINE_HEIGHT));
        assert_eq!(surface.lines()[0].y, MARGIN);
    }

    #[test]
    fn test_wrap_to_width() {
        // 200 - 20 = 180 usable pixels, 12 characters including the trailing space
        let surface = TextSurface::new(Resolution::new(200, 480));
        let lines = surface.wrap("aaaa bbbb cccc dddd");
        assert_eq!(lines, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let surface = TextSurface::new(Resolution::new(100, 480));
        let lines = surface.wrap("a abcdefghijklmnop b");
        assert_eq!(lines, vec!["a", "abcdefghijklmnop", "b"]);
    }

    #[test]
    fn test_overflow_clears_and_wraps_to_top() {
        // Room for (100 - 10) / 24 = 3 full lines below the margin
        let mut surface = TextSurface::new(Resolution::new(640, 100));
        for i in 0..3 {
            surface.render(&format!("line {}", i));
        }
        assert_eq!(surface.lines().len(), 3);
        assert_eq!(surface.overflow_clears(), 0);

        surface.render("line 3");
        assert_eq!(surface.overflow_clears(), 1);
        assert_eq!(surface.lines().len(), 1);
        assert_eq!(surface.lines()[0].text, "line 3");
        assert_eq!(surface.lines()[0].y, MARGIN);
    }

    #[test]
    fn test_reinitialize_resets() {
        let mut surface = TextSurface::default();
        surface.render("something");
        surface.reinitialize(Resolution::new(800, 600));
        assert!(surface.lines().is_empty());
        assert_eq!(surface.cursor(), (MARGIN, MARGIN));
        assert_eq!(surface.resolution(), Resolution::new(800, 600));
    }
}
