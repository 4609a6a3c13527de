use crate::constants::BUBBLE_WIDTH_PERCENT;
use crate::models::Message;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// Horizontal padding inside a bubble, per side.
const PADDING: usize = 1;

/// A message drawn as a chat bubble: user on the right in blue, bot on the left.
#[derive(Debug, Clone)]
pub struct ChatMessage<'a> {
    sender: &'a str,
    timestamp: Option<&'a str>,
    content: &'a str,
    from_user: bool,
}

impl<'a> ChatMessage<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            sender: &message.sender,
            timestamp: Some(&message.timestamp),
            content: &message.text,
            from_user: message.is_user,
        }
    }

    /// The transient bubble shown while the bot is preparing an answer.
    pub fn typing(content: &'a str) -> Self {
        Self {
            sender: "",
            timestamp: None,
            content,
            from_user: false,
        }
    }

    pub fn render(&self, area_width: u16) -> Vec<Line<'static>> {
        let style = self.get_base_style();
        let max_inner = max_bubble_width(area_width).saturating_sub(PADDING * 2).max(1);

        let body: Vec<String> = wrap(self.content, max_inner)
            .into_iter()
            .map(|line| line.into_owned())
            .collect();
        let header = self.header_text();

        let inner = body
            .iter()
            .map(|line| line.width())
            .chain(header.as_ref().map(|h| h.width()))
            .max()
            .unwrap_or(0)
            .min(max_inner);

        let mut lines = Vec::with_capacity(body.len() + 1);
        if header.is_some() {
            lines.push(self.render_header(inner, style));
        }
        for text in body {
            lines.push(self.bubble_line(vec![Span::styled(pad(&text, inner), style)], style));
        }
        lines
    }

    fn get_base_style(&self) -> Style {
        if self.from_user {
            Style::default().fg(Color::White).bg(Color::Blue)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        }
    }

    fn header_text(&self) -> Option<String> {
        if self.sender.is_empty() {
            return None;
        }
        Some(match self.timestamp {
            Some(ts) => format!("{}  {}", self.sender, ts),
            None => self.sender.to_string(),
        })
    }

    fn render_header(&self, inner: usize, style: Style) -> Line<'static> {
        let mut spans = vec![Span::styled(
            self.sender.to_string(),
            style.add_modifier(Modifier::BOLD),
        )];
        let mut used = self.sender.width();
        if let Some(ts) = self.timestamp {
            spans.push(Span::styled("  ".to_string(), style));
            spans.push(Span::styled(ts.to_string(), style.add_modifier(Modifier::DIM)));
            used += 2 + ts.width();
        }
        spans.push(Span::styled(" ".repeat(inner.saturating_sub(used)), style));
        self.bubble_line(spans, style)
    }

    fn bubble_line(&self, content: Vec<Span<'static>>, style: Style) -> Line<'static> {
        let mut spans = Vec::with_capacity(content.len() + 2);
        spans.push(Span::styled(" ".repeat(PADDING), style));
        spans.extend(content);
        spans.push(Span::styled(" ".repeat(PADDING), style));

        let alignment = if self.from_user {
            Alignment::Right
        } else {
            Alignment::Left
        };
        Line::from(spans).alignment(alignment)
    }
}

pub fn max_bubble_width(area_width: u16) -> usize {
    (area_width as usize * BUBBLE_WIDTH_PERCENT as usize / 100).max(PADDING * 2 + 1)
}

fn pad(text: &str, width: usize) -> String {
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(text.width())));
    padded
}

/// Lays out the whole conversation, plus the typing bubble when `typing` is set.
pub fn render_transcript(
    messages: &[Message],
    typing: Option<&str>,
    area_width: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let bubbles = messages
        .iter()
        .map(ChatMessage::new)
        .chain(typing.map(ChatMessage::typing));

    for bubble in bubbles {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(bubble.render(area_width));
    }
    lines
}
