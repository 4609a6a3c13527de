use crate::constants::{APP_SUBTITLE, APP_TITLE, REFRESH_LABEL};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HEADER_BG: Color = Color::Rgb(100, 13, 95);

pub fn draw_header(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .style(Style::default().fg(Color::White).bg(HEADER_BG))
        .borders(Borders::BOTTOM);

    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(0)
        .constraints([Constraint::Min(1), Constraint::Length(32)])
        .split(Rect {
            height: area.height.saturating_sub(1),
            ..area
        });

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" ⚽ {}", APP_TITLE),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("    {}", APP_SUBTITLE),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Left);

    f.render_widget(title, chunks[0]);

    let refresh = Paragraph::new(Line::from(vec![
        Span::styled(
            " Ctrl+R ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(REFRESH_LABEL, Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Right);

    f.render_widget(refresh, chunks[1]);
}
