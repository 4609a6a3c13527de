use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Draws the key hints.
pub fn draw_footer(f: &mut Frame<'_>, area: Rect) {
    let instructions =
        "Enter: 전송 · Ctrl+R: 데이터 새로고침 · PgUp/PgDn: 스크롤 · Esc/Ctrl+C: 종료";

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
