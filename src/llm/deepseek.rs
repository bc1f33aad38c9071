//! DeepSeek hosted backend (OpenAI-compatible chat completions API).

use super::{Attempt, ChatClient, ChatMessage, ChatOptions, RetryPolicy, chat_with_retry};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

pub struct DeepSeekClient {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: String,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    model: String,
    policy: RetryPolicy,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl DeepSeekClient {
    pub fn new(api_key: &str, model: &str, policy: RetryPolicy) -> Self {
        Self::with_base_url(api_key, model, policy, None)
    }

    pub fn with_base_url(
        api_key: &str,
        model: &str,
        policy: RetryPolicy,
        base_url: Option<&str>,
    ) -> Self {
        let base = base_url
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'))
            .to_string();
        Self {
            cached_auth_header: format!("Bearer {}", api_key.trim()),
            cached_chat_url: format!("{base}/chat/completions"),
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
        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", &self.cached_auth_header)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("DeepSeek request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("DeepSeek returned {status}");
        }

        // A 2xx body that does not decode, or decodes without a string
        // completion at choices[0].message.content, is malformed — not a
        // transport failure, so it must not consume retry attempts.
        let Ok(body) = response.json::<ChatResponse>().await else {
            return Ok(Attempt::Malformed);
        };
        Ok(body
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map_or(Attempt::Malformed, Attempt::Completion))
    }
}

#[async_trait]
impl ChatClient for DeepSeekClient {
    async fn chat(&self, messages: &[ChatMessage], options: Option<ChatOptions>) -> Option<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.policy.resolve_temperature(options.as_ref()),
        };
        chat_with_retry("deepseek", &self.policy, || self.send_once(&request)).await
    }
}
