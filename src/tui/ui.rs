//! UI rendering for the terminal display.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    style::{Color, Style},
};
use crate::display::TextSurface;

/// Main draw function.
pub fn draw(frame: &mut Frame, surface: &TextSurface, status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_screen(frame, chunks[0], surface);
    draw_status(frame, chunks[1], status);
}

/// Draw the program's text, one terminal row per drawn line.
fn draw_screen(frame: &mut Frame, area: Rect, surface: &TextSurface) {
    let lines: Vec<Line> = surface
        .lines()
        .iter()
        .map(|line| Line::from(line.text.clone()))
        .collect();

    let screen = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(format!(" SC display {} ", surface.resolution()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(screen, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, status: &str) {
    let status = Paragraph::new(status.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}
