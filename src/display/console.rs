//! Headless display that writes drawn lines to a stream.

use std::io::{self, Write};
use super::{DisplaySurface, Resolution, TextSurface};

/// Prints every wrapped line to `out` (stdout for `run --headless`).
///
/// Never reports a quit request; stop it with the machine's own halt.
/// The first write error is kept and reported on stderr at release.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    surface: TextSurface,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            surface: TextSurface::default(),
            error: None,
        }
    }

    /// The first write error, if output failed.
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    fn latch(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    pub fn surface(&self) -> &TextSurface {
        &self.surface
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for ConsoleDisplay<W> {
    fn reinitialize(&mut self, resolution: Resolution) {
        self.surface.reinitialize(resolution);
        let result = writeln!(self.out, "-- display {} --", resolution);
        self.latch(result);
    }

    fn render_text(&mut self, text: &str) {
        for line in self.surface.render(text) {
            let result = writeln!(self.out, "{}", line);
            self.latch(result);
        }
    }

    fn poll_quit(&mut self) -> bool {
        false
    }

    fn release(&mut self) {
        let result = self.out.flush();
        self.latch(result);
        if let Some(e) = &self.error {
            eprintln!("⚠️  Display output failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_output() {
        let mut display = ConsoleDisplay::new(Vec::new());
        display.reinitialize(Resolution::new(200, 480));
        display.render_text("aaaa bbbb cccc");
        assert!(!display.poll_quit());
        display.release();

        assert!(display.error().is_none());
        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text, "-- display 200x480 --\naaaa bbbb\ncccc\n");
    }

    /// Writer that fails every call, counting the attempts.
    struct BrokenPipe {
        writes: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            let kind = if self.writes == 1 { io::ErrorKind::BrokenPipe } else { io::ErrorKind::Other };
            Err(io::Error::new(kind, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "closed"))
        }
    }

    #[test]
    fn test_first_write_error_is_kept() {
        let mut display = ConsoleDisplay::new(BrokenPipe { writes: 0 });
        display.reinitialize(Resolution::new(200, 480));
        display.render_text("still drawn");
        display.release();

        assert_eq!(display.error().map(|e| e.kind()), Some(io::ErrorKind::BrokenPipe));
        assert_eq!(display.surface().lines().len(), 1);
        assert!(display.into_inner().writes >= 2);
    }
}
