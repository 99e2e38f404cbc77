//! In-memory display that records every call made to it.

use super::{DisplaySurface, Resolution, TextSurface};
use serde::{Serialize, Deserialize};

/// One call made by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayEvent {
    Reinitialize(Resolution),
    RenderText(String),
    Release,
}

/// Headless display used by tests and the WebAssembly bindings.
///
/// Keeps a full [`TextSurface`] so callers can inspect the layout as well
/// as the raw calls. A quit request can be scripted to arrive after a fixed
/// number of polls.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    events: Vec<DisplayEvent>,
    surface: TextSurface,
    quit_after_polls: Option<u64>,
    polls: u64,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a quit request on poll number `polls + 1` and every poll after it.
    pub fn quit_after(polls: u64) -> Self {
        Self {
            quit_after_polls: Some(polls),
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// Every string passed to `render_text`, in order.
    pub fn rendered_text(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::RenderText(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every resolution passed to `reinitialize`, in order.
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Reinitialize(res) => Some(*res),
                _ => None,
            })
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.events.contains(&DisplayEvent::Release)
    }

    pub fn surface(&self) -> &TextSurface {
        &self.surface
    }
}

impl DisplaySurface for RecordingDisplay {
    fn reinitialize(&mut self, resolution: Resolution) {
        self.surface.reinitialize(resolution);
        self.events.push(DisplayEvent::Reinitialize(resolution));
    }

    fn render_text(&mut self, text: &str) {
        self.surface.render(text);
        self.events.push(DisplayEvent::RenderText(text.to_string()));
    }

    fn poll_quit(&mut self) -> bool {
        let quit = self.quit_after_polls.is_some_and(|limit| self.polls >= limit);
        self.polls += 1;
        quit
    }

    fn release(&mut self) {
        self.events.push(DisplayEvent::Release);
    }
}
