use crate::{
    config::Config,
    constants::{CHAT_PATH, INITIALIZE_PATH},
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    models::{ApiCallLog, ChatReply, ChatRequest, InitializeStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::{Duration, Instant};

/// The chatbot backend as seen by the client.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Asks the backend to refresh its data. Can take minutes.
    async fn initialize(&self) -> ChatResult<InitializeStatus>;

    /// Sends one question and returns the raw answer.
    async fn ask(&self, question: &str) -> ChatResult<ChatReply>;
}

/// `ChatBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    initialize_timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, initialize_timeout: Duration) -> ChatResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            initialize_timeout,
        })
    }

    pub fn from_config(config: &Config) -> ChatResult<Self> {
        Self::new(config.base_url.clone(), config.initialize_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record(&self, endpoint: &str, summary: &str, status: Option<u16>, started: Instant) {
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            request_summary: summary.to_string(),
            response_status: status,
            response_time_ms: started.elapsed().as_millis(),
        });
    }
}

fn ensure_success(response: &Response) -> ChatResult<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(ChatError::HttpStatus {
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn initialize(&self) -> ChatResult<InitializeStatus> {
        let url = self.url(INITIALIZE_PATH);
        let started = Instant::now();

        let result = self
            .client
            .post(&url)
            .timeout(self.initialize_timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.record(&url, "initialize", None, started);
                if e.is_timeout() {
                    return Err(ChatError::Timeout(self.initialize_timeout));
                }
                return Err(e.into());
            }
        };

        self.record(&url, "initialize", Some(response.status().as_u16()), started);
        ensure_success(&response)?;

        let status: InitializeStatus = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Timeout(self.initialize_timeout)
            } else {
                ChatError::malformed(format!("Failed to parse initialize response: {}", e))
            }
        })?;

        log::info!("Backend initialize returned: {}", status.message);
        Ok(status)
    }

    async fn ask(&self, question: &str) -> ChatResult<ChatReply> {
        let url = self.url(CHAT_PATH);
        let started = Instant::now();

        let result = self
            .client
            .post(&url)
            .json(&ChatRequest { question })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.record(&url, "chat", None, started);
                return Err(e.into());
            }
        };

        self.record(&url, "chat", Some(response.status().as_u16()), started);
        ensure_success(&response)?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChatError::malformed(format!("Failed to parse chat response: {}", e)))?;

        let answer = body["answer"]
            .as_str()
            .ok_or_else(|| ChatError::malformed("Response missing `answer`"))?;

        Ok(ChatReply {
            answer: answer.to_string(),
        })
    }
}
