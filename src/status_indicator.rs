use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::REFRESHING_TEXT;

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// The one-line status strip under the conversation: spinner, pending data
/// refreshes and the current notice.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    refreshing: usize,
    notice: Option<String>,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_refresh(&mut self) {
        self.refreshing += 1;
    }

    pub fn end_refresh(&mut self) {
        self.refreshing = self.refreshing.saturating_sub(1);
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing > 0
    }

    /// Shows a notice until the next key press.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns true if there was a notice to dismiss.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();

        if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                format!(" {} ", notice),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                "  (아무 키나 누르세요)",
                Style::default().fg(Color::DarkGray),
            ));
        } else if self.is_refreshing() {
            spans.push(Span::styled(self.spinner(), Style::default().fg(Color::Gray)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                REFRESHING_TEXT,
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
