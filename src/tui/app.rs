//! Terminal display surface.

use std::io::{stdout, Stdout};
use std::time::Duration;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use crate::display::{DisplaySurface, Resolution, TextSurface};

/// Display surface drawn in the terminal's alternate screen.
///
/// The pixel resolution requested by the program is kept in a
/// [`TextSurface`], which decides wrapping and clearing; the terminal just
/// shows its lines.
pub struct TerminalDisplay {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    /// Visible text.
    pub surface: TextSurface,
    /// Status line shown under the screen.
    pub status: String,
    /// Wait for a key press before giving the terminal back.
    hold_on_release: bool,
}

impl TerminalDisplay {
    /// Switch the terminal to raw mode and the alternate screen.
    pub fn new(hold_on_release: bool) -> std::io::Result<Self> {
        let terminal = undo_on_error(enable_raw_mode, Self::enter_screen, disable_raw_mode)?;

        let mut display = Self {
            terminal: Some(terminal),
            surface: TextSurface::default(),
            status: "Running. Press 'q' or Esc to quit.".into(),
            hold_on_release,
        };
        display.redraw();
        Ok(display)
    }

    fn enter_screen() -> std::io::Result<Terminal<CrosstermBackend<Stdout>>> {
        stdout().execute(EnterAlternateScreen)?;
        Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| {
            let _ = stdout().execute(LeaveAlternateScreen);
            e
        })
    }

    fn redraw(&mut self) {
        let surface = &self.surface;
        let status = &self.status;
        if let Some(terminal) = self.terminal.as_mut() {
            let _ = terminal.draw(|frame| super::ui::draw(frame, surface, status));
        }
    }

    fn restore(&mut self) {
        if self.terminal.take().is_some() {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
        }
    }
}

/// Run `enable` then `enter`; if `enter` fails, run `disable` before
/// returning its error.
fn undo_on_error<T>(
    enable: impl FnOnce() -> std::io::Result<()>,
    enter: impl FnOnce() -> std::io::Result<T>,
    disable: impl FnOnce() -> std::io::Result<()>,
) -> std::io::Result<T> {
    enable()?;
    enter().map_err(|e| {
        let _ = disable();
        e
    })
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl DisplaySurface for TerminalDisplay {
    fn reinitialize(&mut self, resolution: Resolution) {
        self.surface.reinitialize(resolution);
        self.redraw();
    }

    fn render_text(&mut self, text: &str) {
        self.surface.render(text);
        self.redraw();
    }

    fn poll_quit(&mut self) -> bool {
        while let Ok(true) = event::poll(Duration::ZERO) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press && is_quit_key(&key) => {
                    return true;
                }
                Ok(Event::Resize(..)) => self.redraw(),
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        false
    }

    fn release(&mut self) {
        if self.hold_on_release && self.terminal.is_some() {
            self.status = "Halted. Press any key to exit.".into();
            self.redraw();
            loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break,
                    Ok(Event::Resize(..)) => self.redraw(),
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
        self.restore();
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_raw_mode_undone_when_screen_fails() {
        let raw = Cell::new(false);
        let result: std::io::Result<()> = undo_on_error(
            || { raw.set(true); Ok(()) },
            || Err(Error::new(ErrorKind::Other, "no alternate screen")),
            || { raw.set(false); Ok(()) },
        );
        assert!(result.is_err());
        assert!(!raw.get());
    }

    #[test]
    fn test_raw_mode_kept_on_success() {
        let raw = Cell::new(false);
        let result = undo_on_error(
            || { raw.set(true); Ok(()) },
            || Ok(7),
            || { raw.set(false); Ok(()) },
        );
        assert_eq!(result.unwrap(), 7);
        assert!(raw.get());
    }

    #[test]
    fn test_enable_failure_skips_the_rest() {
        let entered = Cell::new(false);
        let result: std::io::Result<()> = undo_on_error(
            || Err(Error::new(ErrorKind::Other, "not a tty")),
            || { entered.set(true); Ok(()) },
            || Ok(()),
        );
        assert!(result.is_err());
        assert!(!entered.get());
    }

    #[test]
    fn test_quit_keys() {
        let key = |code, modifiers| KeyEvent::new(code, modifiers);
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
