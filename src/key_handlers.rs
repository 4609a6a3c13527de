use crate::app::App;
use crate::chat_view::PAGE_LINES;
use crate::storage::KeyValueStorage;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key<S: KeyValueStorage>(key: KeyEvent, app: &mut App<S>) {
    // A notice behaves like an alert: the next key only dismisses it.
    if app.status_indicator.dismiss_notice() {
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => app.send_message(),
        KeyCode::PageUp => app.scroll.scroll_up(PAGE_LINES),
        KeyCode::PageDown => app.scroll.scroll_down(PAGE_LINES),
        KeyCode::Backspace => app.chatbot.pop_input(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.quit(),
                    'r' => app.refresh_data(),
                    'u' => app.scroll.scroll_up(PAGE_LINES),
                    'd' => app.scroll.scroll_down(PAGE_LINES),
                    _ => {}
                }
            } else {
                app.chatbot.push_input(c);
            }
        }
        _ => {}
    }
}
