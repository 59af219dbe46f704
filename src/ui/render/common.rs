//! Common rendering utilities

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Get the current spinner frame based on tick count
pub fn get_spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize / 2) % SPINNER_FRAMES.len()]
}

/// Three-line band in the vertical middle of `area`
fn centered_band(area: Rect) -> Rect {
    Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Percentage(40),
    ])
    .split(area)[1]
}

pub fn render_loading(frame: &mut Frame, message: &str, tick_count: u64) {
    let text = vec![
        Line::from(vec![
            Span::styled(
                get_spinner_frame(tick_count),
                Style::default().fg(theme::ACCENT),
            ),
            Span::styled(format!(" {}", message), Style::default().fg(theme::TEXT)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press q or Ctrl+C to quit",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_band(frame.area()));
}

pub fn render_error(frame: &mut Frame, error: &str) {
    let text = vec![
        Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(theme::ERROR),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to exit",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_band(frame.area()));
}
