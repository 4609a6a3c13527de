use crate::app::App;
use crate::chat_message::render_transcript;
use crate::constants::{INPUT_PLACEHOLDER, TYPING_TEXT};
use crate::storage::KeyValueStorage;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Lines moved per PageUp/PageDown.
pub const PAGE_LINES: usize = 5;

/// Vertical position of the conversation view.
///
/// While following, each frame moves the offset part of the way toward the
/// bottom, which gives the smooth scroll after new messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    max: usize,
    follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max: 0,
            follow: true,
        }
    }
}

impl ScrollState {
    pub fn to_bottom(&mut self) {
        self.follow = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines).min(self.max);
        if self.offset == self.max {
            self.follow = true;
        }
    }

    /// Advances one animation frame and returns the offset to draw with.
    pub fn step(&mut self, max_scroll: usize) -> usize {
        self.max = max_scroll;
        if self.offset > max_scroll {
            self.offset = max_scroll;
        }
        if self.follow && self.offset < max_scroll {
            let gap = max_scroll - self.offset;
            self.offset += (gap / 3).max(1);
        }
        self.offset
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

pub fn draw_chat<S: KeyValueStorage>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let chat_vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    draw_messages(f, app, chat_vertical_chunks[0]);
    app.status_indicator.render(f, chat_vertical_chunks[1]);
    draw_input(f, app, chat_vertical_chunks[2]);
}

fn draw_messages<S: KeyValueStorage>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let typing = app
        .chatbot
        .is_awaiting_reply()
        .then(|| format!("{} {}", app.status_indicator.spinner(), TYPING_TEXT));
    let lines = render_transcript(app.chatbot.messages(), typing.as_deref(), area.width);

    // Only the visible window goes to ratatui, whose scroll offset is a u16.
    let height = area.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    let start = app.scroll.step(max_scroll);
    let end = (start + height).min(lines.len());
    let visible = lines[start..end].to_vec();

    f.render_widget(Paragraph::new(visible), area);
}

fn draw_input<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let busy = app.chatbot.is_awaiting_reply();
    let border_style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Magenta)
    };
    let send_hint = if busy { " 전송 중... " } else { " Enter ⏎ 전송 " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title_bottom(Line::from(send_hint).right_aligned());

    let text = app.chatbot.input();
    let content = if text.is_empty() {
        Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(text, Style::default().fg(Color::White)))
    };

    let visible_width = area.width.saturating_sub(2);
    let text_width = text.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width.saturating_sub(1));

    f.render_widget(
        Paragraph::new(content)
            .block(block)
            .scroll((0, scroll_offset)),
        area,
    );

    let cursor_x = area.x + 1 + text_width - scroll_offset;
    f.set_cursor_position((cursor_x, area.y + 1));
}
