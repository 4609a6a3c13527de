// chatbot.rs

use crate::api::ChatBackend;
use crate::config::Config;
use crate::conversation::MessageStore;
use crate::errors::ChatResult;
use crate::models::{ChatReply, Message};
use crate::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};

/// What happens to a failed chat request after it is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The turn simply stays unanswered.
    #[default]
    Swallow,
    /// The error is handed back to the caller as well.
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingReply,
}

/// Result of trying to start a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was recorded and this question must be sent.
    Dispatched(String),
    /// Nothing but whitespace was typed.
    Blank,
    /// A reply is still pending, so nothing was sent.
    Busy,
}

/// Display names and time format used for new messages.
#[derive(Debug, Clone)]
pub struct Identities {
    pub user_label: String,
    pub bot_label: String,
    pub time_format: String,
}

impl Identities {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_label: config.user_label.clone(),
            bot_label: config.bot_label.clone(),
            time_format: config.time_format.clone(),
        }
    }
}

/// The conversation controller: owns the history, the input buffer and the
/// request state, and persists after every change to the history.
#[derive(Debug)]
pub struct Chatbot<S> {
    store: MessageStore<S>,
    messages: Vec<Message>,
    input: String,
    state: ConversationState,
    policy: FailurePolicy,
    identities: Identities,
}

impl<S: KeyValueStorage> Chatbot<S> {
    pub fn new(storage: S, identities: Identities, policy: FailurePolicy) -> Self {
        let store = MessageStore::new(
            storage,
            identities.bot_label.clone(),
            identities.time_format.clone(),
        );
        let messages = store.load();
        Self {
            store,
            messages,
            input: String::new(),
            state: ConversationState::Idle,
            policy,
            identities,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Also drives the typing bubble: a pending reply means the bot is typing.
    pub fn is_awaiting_reply(&self) -> bool {
        self.state == ConversationState::AwaitingReply
    }

    pub fn store(&self) -> &MessageStore<S> {
        &self.store
    }

    /// Records the pending input as a user turn and enters `AwaitingReply`.
    pub fn begin_turn(&mut self) -> SubmitOutcome {
        if self.state == ConversationState::AwaitingReply {
            log::debug!("Ignoring submit while a reply is pending");
            return SubmitOutcome::Busy;
        }
        if self.input.trim().is_empty() {
            return SubmitOutcome::Blank;
        }

        let question = std::mem::take(&mut self.input);
        let message = Message::user(
            self.messages.len(),
            &self.identities.user_label,
            question.clone(),
            &self.identities.time_format,
        );
        self.messages.push(message);
        self.persist();
        self.state = ConversationState::AwaitingReply;
        SubmitOutcome::Dispatched(question)
    }

    /// Resolves the pending turn. The state returns to `Idle` whatever the result.
    ///
    /// Returns the appended bot message on success. A failure is logged and,
    /// under `FailurePolicy::Surface`, returned.
    pub fn finish_turn(&mut self, result: ChatResult<ChatReply>) -> ChatResult<Option<&Message>> {
        if self.state != ConversationState::AwaitingReply {
            log::warn!("Dropping a reply that arrived with no pending turn");
            return Ok(None);
        }
        self.state = ConversationState::Idle;

        match result {
            Ok(reply) => {
                let message = Message::bot(
                    self.messages.len(),
                    &self.identities.bot_label,
                    &reply.answer,
                    &self.identities.time_format,
                );
                self.messages.push(message);
                self.persist();
                Ok(self.messages.last())
            }
            Err(e) => {
                log::error!("Failed to send message: {}", e);
                match self.policy {
                    FailurePolicy::Swallow => Ok(None),
                    FailurePolicy::Surface => Err(e),
                }
            }
        }
    }

    /// Runs a whole turn against `backend`.
    pub async fn submit<B>(&mut self, backend: &B) -> ChatResult<SubmitOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        let outcome = self.begin_turn();
        if let SubmitOutcome::Dispatched(question) = &outcome {
            let result = backend.ask(question).await;
            self.finish_turn(result)?;
        }
        Ok(outcome)
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.messages) {
            log::error!("Failed to save conversation history: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::ChatError;
    use crate::models::InitializeStatus;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned `/chat` results and records the questions it was asked.
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        replies: Mutex<VecDeque<ChatResult<ChatReply>>>,
        pub(crate) asked: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub(crate) fn answering(answers: &[&str]) -> Self {
            let backend = Self::default();
            for answer in answers {
                backend.push(Ok(ChatReply {
                    answer: answer.to_string(),
                }));
            }
            backend
        }

        pub(crate) fn push(&self, reply: ChatResult<ChatReply>) {
            self.replies.lock().unwrap().push_back(reply);
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn initialize(&self) -> ChatResult<InitializeStatus> {
            Ok(InitializeStatus {
                message: "Data initialized successfully".to_string(),
            })
        }

        async fn ask(&self, question: &str) -> ChatResult<ChatReply> {
            self.asked.lock().unwrap().push(question.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ChatError::HttpStatus { status: 503 }))
        }
    }

    pub(crate) fn identities() -> Identities {
        Identities {
            user_label: "나".to_string(),
            bot_label: "프림이".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }

    fn chatbot(policy: FailurePolicy) -> Chatbot<MemoryStorage> {
        Chatbot::new(MemoryStorage::new(), identities(), policy)
    }

    fn reload(bot: &Chatbot<MemoryStorage>) -> Vec<Message> {
        MessageStore::new(bot.store().storage().clone(), "프림이", "%H:%M").load()
    }

    #[test]
    fn test_starts_with_welcome() {
        let bot = chatbot(FailurePolicy::Swallow);
        assert_eq!(bot.messages().len(), 1);
        assert!(!bot.messages()[0].is_user);
        assert_eq!(bot.state(), ConversationState::Idle);
    }

    #[test]
    fn test_blank_input_changes_nothing() {
        let mut bot = chatbot(FailurePolicy::Swallow);
        for blank in ["", "   ", "\t\n "] {
            bot.set_input(blank);
            assert_eq!(bot.begin_turn(), SubmitOutcome::Blank);
            assert_eq!(bot.messages().len(), 1);
            assert_eq!(bot.state(), ConversationState::Idle);
        }
    }

    #[test]
    fn test_begin_turn_records_verbatim_and_persists() {
        let mut bot = chatbot(FailurePolicy::Swallow);
        bot.set_input("  손흥민 득점은? ");

        let outcome = bot.begin_turn();
        assert_eq!(outcome, SubmitOutcome::Dispatched("  손흥민 득점은? ".to_string()));
        assert_eq!(bot.input(), "");
        assert!(bot.is_awaiting_reply());

        let last = bot.messages().last().unwrap();
        assert!(last.is_user);
        assert_eq!(last.text, "  손흥민 득점은? ");
        assert_eq!(last.sender, "나");
        assert_eq!(last.id, 1);

        assert_eq!(reload(&bot), bot.messages());
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let mut bot = chatbot(FailurePolicy::Swallow);
        bot.set_input("first");
        assert!(matches!(bot.begin_turn(), SubmitOutcome::Dispatched(_)));

        bot.set_input("second");
        assert_eq!(bot.begin_turn(), SubmitOutcome::Busy);
        assert_eq!(bot.messages().len(), 2);
        assert_eq!(bot.input(), "second");
    }

    #[test]
    fn test_reply_strips_asterisks() {
        let mut bot = chatbot(FailurePolicy::Swallow);
        bot.set_input("q");
        bot.begin_turn();

        let appended = bot
            .finish_turn(Ok(ChatReply {
                answer: "A*B*C".to_string(),
            }))
            .unwrap()
            .cloned()
            .unwrap();
        assert_eq!(appended.text, "ABC");
        assert!(!appended.is_user);
        assert_eq!(appended.id, 2);
        assert_eq!(bot.state(), ConversationState::Idle);
    }

    #[test]
    fn test_swallowed_failure_leaves_turn_unanswered() {
        let mut bot = chatbot(FailurePolicy::Swallow);
        bot.set_input("q");
        bot.begin_turn();

        let result = bot.finish_turn(Err(ChatError::HttpStatus { status: 500 }));
        assert!(matches!(result, Ok(None)));
        assert_eq!(bot.messages().len(), 2);
        assert_eq!(bot.state(), ConversationState::Idle);
    }

    #[test]
    fn test_surfaced_failure_still_returns_to_idle() {
        let mut bot = chatbot(FailurePolicy::Surface);
        bot.set_input("q");
        bot.begin_turn();

        let result = bot.finish_turn(Err(ChatError::malformed("Response missing `answer`")));
        assert!(matches!(result, Err(ChatError::MalformedResponse(_))));
        assert_eq!(bot.messages().len(), 2);
        assert_eq!(bot.state(), ConversationState::Idle);
    }

    #[test]
    fn test_stray_reply_is_dropped() {
        let mut bot = chatbot(FailurePolicy::Surface);
        let result = bot.finish_turn(Ok(ChatReply {
            answer: "late".to_string(),
        }));
        assert!(matches!(result, Ok(None)));
        assert_eq!(bot.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_hi_hello_conversation() {
        let backend = ScriptedBackend::answering(&["Hello!"]);
        let mut bot = chatbot(FailurePolicy::Swallow);

        bot.set_input("hi");
        let outcome = bot.submit(&backend).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Dispatched("hi".to_string()));

        let turns: Vec<(bool, &str)> = bot.messages()[1..]
            .iter()
            .map(|m| (m.is_user, m.text.as_str()))
            .collect();
        assert_eq!(turns, vec![(true, "hi"), (false, "Hello!")]);
        assert_eq!(backend.asked.lock().unwrap().as_slice(), ["hi"]);
        assert_eq!(reload(&bot), bot.messages());
    }

    #[tokio::test]
    async fn test_blank_submit_sends_nothing() {
        let backend = ScriptedBackend::answering(&["unused"]);
        let mut bot = chatbot(FailurePolicy::Swallow);

        bot.set_input("   ");
        let outcome = bot.submit(&backend).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Blank);
        assert!(backend.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_turn_then_retry_by_user() {
        let backend = ScriptedBackend::default();
        backend.push(Err(ChatError::HttpStatus { status: 500 }));
        backend.push(Ok(ChatReply {
            answer: "맨시티".to_string(),
        }));
        let mut bot = chatbot(FailurePolicy::Swallow);

        bot.set_input("우승팀 예측");
        bot.submit(&backend).await.unwrap();
        bot.set_input("우승팀 예측");
        bot.submit(&backend).await.unwrap();

        let texts: Vec<&str> = bot.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[1..], ["우승팀 예측", "우승팀 예측", "맨시티"]);
        let ids: Vec<usize> = bot.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_history_resumes_after_restart() {
        let backend = ScriptedBackend::answering(&["20골"]);
        let mut bot = chatbot(FailurePolicy::Swallow);
        bot.set_input("홀란드 득점");
        bot.submit(&backend).await.unwrap();

        let storage = bot.store().storage().clone();
        let resumed = Chatbot::new(storage, identities(), FailurePolicy::Swallow);
        assert_eq!(resumed.messages(), bot.messages());
    }

    /// Reads as empty and refuses every write.
    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> ChatResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: String) -> ChatResult<()> {
            Err(ChatError::storage_error("disk full"))
        }
    }

    #[test]
    fn test_turn_completes_when_saving_fails() {
        let mut bot = Chatbot::new(FailingStorage, identities(), FailurePolicy::Surface);
        bot.set_input("아스날 경기 일정");

        let outcome = bot.begin_turn();
        assert_eq!(outcome, SubmitOutcome::Dispatched("아스날 경기 일정".to_string()));
        assert_eq!(bot.messages().len(), 2);
        assert!(bot.is_awaiting_reply());

        let appended = bot
            .finish_turn(Ok(ChatReply {
                answer: "토요일 3시".to_string(),
            }))
            .unwrap()
            .cloned();
        assert_eq!(appended.map(|m| m.text), Some("토요일 3시".to_string()));
        assert_eq!(bot.messages().len(), 3);
        assert_eq!(bot.state(), ConversationState::Idle);
    }
}
