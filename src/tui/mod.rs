//! Terminal display for the SC machine.
//!
//! Shows the machine's text output in the alternate screen and turns
//! `q`, `Esc` or `Ctrl-C` into a quit request.

mod app;
mod ui;

pub use app::TerminalDisplay;
