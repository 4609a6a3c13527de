use crate::api::ChatBackend;
use crate::chat_view::ScrollState;
use crate::chatbot::{Chatbot, SubmitOutcome};
use crate::constants::{REFRESH_SUCCESS_NOTICE, SEND_FAILED_PREFIX};
use crate::errors::ChatResult;
use crate::models::{ChatReply, InitializeStatus};
use crate::status_indicator::StatusIndicator;
use crate::storage::{FileStorage, KeyValueStorage};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Results of background requests, delivered back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Reply(ChatResult<ChatReply>),
    Initialized(ChatResult<InitializeStatus>),
}

pub struct App<S = FileStorage> {
    pub chatbot: Chatbot<S>,
    pub status_indicator: StatusIndicator,
    pub scroll: ScrollState,
    pub should_quit: bool,
    backend: Arc<dyn ChatBackend>,
    events: UnboundedSender<AppEvent>,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(
        chatbot: Chatbot<S>,
        backend: Arc<dyn ChatBackend>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            chatbot,
            status_indicator: StatusIndicator::new(),
            scroll: ScrollState::default(),
            should_quit: false,
            backend,
            events,
        }
    }

    /// Submits the pending input. The request runs on its own task and its
    /// result comes back as `AppEvent::Reply`.
    pub fn send_message(&mut self) {
        match self.chatbot.begin_turn() {
            SubmitOutcome::Dispatched(question) => {
                self.scroll.to_bottom();

                let backend = Arc::clone(&self.backend);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = backend.ask(&question).await;
                    if events.send(AppEvent::Reply(result)).is_err() {
                        log::debug!("UI closed before the chat reply arrived");
                    }
                });
            }
            SubmitOutcome::Blank => self.scroll.to_bottom(),
            SubmitOutcome::Busy => {}
        }
    }

    /// Asks the backend to reload its data. Overlapping refreshes are allowed.
    pub fn refresh_data(&mut self) {
        self.status_indicator.begin_refresh();

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = backend.initialize().await;
            if events.send(AppEvent::Initialized(result)).is_err() {
                log::debug!("UI closed before the data refresh finished");
            }
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Reply(result) => {
                if let Err(e) = self.chatbot.finish_turn(result) {
                    self.status_indicator
                        .set_notice(format!("{}: {}", SEND_FAILED_PREFIX, e));
                }
                self.scroll.to_bottom();
            }
            AppEvent::Initialized(result) => {
                self.status_indicator.end_refresh();
                match result {
                    Ok(status) if status.is_success() => {
                        self.status_indicator.set_notice(REFRESH_SUCCESS_NOTICE);
                    }
                    Ok(status) => {
                        log::info!("Data refresh finished with: {}", status.message);
                    }
                    Err(e) => log::error!("Data refresh failed: {}", e),
                }
            }
        }
    }

    pub fn tick(&mut self) {
        self.status_indicator.update_spinner();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::tests::{identities, ScriptedBackend};
    use crate::chatbot::{ConversationState, FailurePolicy};
    use crate::errors::ChatError;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn app_with(
        backend: Arc<dyn ChatBackend>,
        policy: FailurePolicy,
    ) -> (App<MemoryStorage>, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let chatbot = Chatbot::new(MemoryStorage::new(), identities(), policy);
        (App::new(chatbot, backend, tx), rx)
    }

    #[tokio::test]
    async fn test_send_and_receive_reply() {
        let backend = Arc::new(ScriptedBackend::answering(&["*맨시티* 1위"]));
        let (mut app, mut rx) = app_with(backend, FailurePolicy::Swallow);

        app.chatbot.set_input("순위 알려줘");
        app.send_message();
        assert!(app.chatbot.is_awaiting_reply());

        // Sending again while the reply is pending does nothing.
        app.chatbot.set_input("또 보냄");
        app.send_message();
        assert_eq!(app.chatbot.messages().len(), 2);

        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert!(!app.chatbot.is_awaiting_reply());
        assert_eq!(app.chatbot.state(), ConversationState::Idle);
        let last = app.chatbot.messages().last().unwrap();
        assert_eq!(last.text, "맨시티 1위");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_surfaced_failure_becomes_notice() {
        let backend = Arc::new(ScriptedBackend::default());
        let (mut app, mut rx) = app_with(backend, FailurePolicy::Surface);

        app.chatbot.set_input("hi");
        app.send_message();
        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert!(app.status_indicator.notice().unwrap().contains("503"));
        assert_eq!(app.chatbot.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_swallowed_failure_is_silent() {
        let backend = Arc::new(ScriptedBackend::default());
        let (mut app, mut rx) = app_with(backend, FailurePolicy::Swallow);

        app.chatbot.set_input("hi");
        app.send_message();
        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert_eq!(app.status_indicator.notice(), None);
        assert!(!app.chatbot.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_refresh_success_shows_notice() {
        let backend = Arc::new(ScriptedBackend::default());
        let (mut app, mut rx) = app_with(backend, FailurePolicy::Swallow);

        app.refresh_data();
        app.refresh_data();
        assert!(app.status_indicator.is_refreshing());

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            app.handle_event(event);
        }
        assert!(!app.status_indicator.is_refreshing());
        assert_eq!(app.status_indicator.notice(), Some(REFRESH_SUCCESS_NOTICE));
    }

    struct FailingInit;

    #[async_trait]
    impl ChatBackend for FailingInit {
        async fn initialize(&self) -> ChatResult<InitializeStatus> {
            Err(ChatError::HttpStatus { status: 500 })
        }

        async fn ask(&self, _question: &str) -> ChatResult<ChatReply> {
            Err(ChatError::HttpStatus { status: 500 })
        }
    }

    #[tokio::test]
    async fn test_refresh_failure_has_no_notice() {
        let (mut app, mut rx) = app_with(Arc::new(FailingInit), FailurePolicy::Surface);

        app.refresh_data();
        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert!(!app.status_indicator.is_refreshing());
        assert_eq!(app.status_indicator.notice(), None);
    }

    #[test]
    fn test_unexpected_refresh_message_has_no_notice() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let chatbot = Chatbot::new(MemoryStorage::new(), identities(), FailurePolicy::Swallow);
        let mut app = App::new(chatbot, Arc::new(FailingInit), tx);

        app.status_indicator.begin_refresh();
        app.handle_event(AppEvent::Initialized(Ok(InitializeStatus {
            message: "Already up to date".to_string(),
        })));
        assert_eq!(app.status_indicator.notice(), None);
    }
}
