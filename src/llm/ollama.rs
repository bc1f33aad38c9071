//! Ollama local backend (no API key).
//!
//! Same retry contract as the hosted backend, different envelope: streaming
//! is forced off and the temperature rides in a nested `options` object.

use super::{Attempt, ChatClient, ChatMessage, ChatOptions, RetryPolicy, chat_with_retry};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OllamaClient {
    base_url: String,
    model: String,
    policy: RetryPolicy,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, policy: RetryPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            policy,
            client: Client::builder()
                .timeout(policy.timeout)
                .connect_timeout(std::time::Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(std::time::Duration::from_secs(90))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn send_once(&self, request: &ChatRequest) -> anyhow::Result<Attempt> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Ollama request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Ollama returned {status}");
        }

        let Ok(body) = response.json::<ChatResponse>().await else {
            return Ok(Attempt::Malformed);
        };
        Ok(body
            .message
            .and_then(|message| message.content)
            .map_or(Attempt::Malformed, Attempt::Completion))
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage], options: Option<ChatOptions>) -> Option<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: false,
            options: Options {
                temperature: self.policy.resolve_temperature(options.as_ref()),
            },
        };
        chat_with_retry("ollama", &self.policy, || self.send_once(&request)).await
    }
}
