//! Backend-agnostic chat layer.
//!
//! Two wire protocols (hosted DeepSeek-style, local Ollama-style) hide behind
//! one [`ChatClient`] contract. The contract degrades instead of erroring: a
//! call either produces completion text or `None`, never a transport error.

pub mod deepseek;
pub mod factory;
pub mod ollama;

pub use deepseek::DeepSeekClient;
pub use factory::create_client;
pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Pause between retry attempts. Deliberately a fixed delay, not exponential;
/// callers budget worst-case latency as `timeout * attempts + delay * (attempts - 1)`.
pub(crate) const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged turn of a conversation. Role ordering is caller-defined;
/// no validation is performed.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call overrides; absent values fall back to configuration defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub temperature: Option<f64>,
}

/// Retry knobs shared by every backend, snapshotted from configuration at
/// client construction time.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first. Always >= 1.
    pub attempts: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Sampling temperature when the caller passes none.
    pub default_temperature: f64,
}

impl RetryPolicy {
    pub(crate) fn resolve_temperature(&self, options: Option<&ChatOptions>) -> f64 {
        options
            .and_then(|o| o.temperature)
            .unwrap_or(self.default_temperature)
    }
}

/// Outcome of a single request attempt, before retry semantics apply.
#[derive(Debug)]
pub(crate) enum Attempt {
    /// The response carried a string completion field.
    Completion(String),
    /// 2xx response whose body lacked the expected completion field.
    /// Retrying cannot fix a response-shape problem, so this short-circuits.
    Malformed,
}

/// The one chat contract every backend implements.
///
/// Returns the trimmed completion text, or `None` after the shared retry
/// algorithm has run out of attempts or hit a malformed response. Transport
/// problems never surface as errors.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], options: Option<ChatOptions>) -> Option<String>;
}

/// Shared retry loop. `send` issues exactly one request; transport failures
/// are retried with a fixed delay, a malformed response returns `None` right
/// away, and success returns the completion trimmed of surrounding whitespace.
pub(crate) async fn chat_with_retry<F, Fut>(
    backend: &str,
    policy: &RetryPolicy,
    mut send: F,
) -> Option<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Attempt>>,
{
    for attempt in 1..=policy.attempts {
        match send().await {
            Ok(Attempt::Completion(text)) => return Some(text.trim().to_string()),
            Ok(Attempt::Malformed) => {
                warn!(backend, "malformed response, missing completion field");
                return None;
            }
            Err(err) => {
                warn!(backend, attempt, error = %err, "chat request failed");
                if attempt == policy.attempts {
                    return None;
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            timeout: Duration::from_secs(60),
            default_temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn success_returns_trimmed_text() {
        let result = chat_with_retry("test", &policy(3), || async {
            Ok(Attempt::Completion("  hello world \n".to_string()))
        })
        .await;
        assert_eq!(result.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn success_on_first_attempt_makes_one_call() {
        let calls = AtomicU32::new(0);
        let result = chat_with_retry("test", &policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Attempt::Completion("ok".to_string())) }
        })
        .await;
        assert_eq!(result.as_deref(), Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_transport_uses_every_attempt() {
        for attempts in 1..=4_u32 {
            let calls = AtomicU32::new(0);
            let started = tokio::time::Instant::now();
            let result = chat_with_retry("test", &policy(attempts), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(anyhow::anyhow!("connection refused")) }
            })
            .await;
            assert_eq!(result, None);
            assert_eq!(calls.load(Ordering::SeqCst), attempts);
            // Fixed delay between attempts: exactly attempts - 1 waits.
            assert_eq!(
                started.elapsed(),
                RETRY_DELAY * (attempts - 1),
                "unexpected delay total for {attempts} attempts"
            );
        }
    }

    #[tokio::test]
    async fn malformed_response_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result = chat_with_retry("test", &policy(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Attempt::Malformed) }
        })
        .await;
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let result = chat_with_retry("test", &policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(anyhow::anyhow!("timeout"))
                } else {
                    Ok(Attempt::Completion("recovered".to_string()))
                }
            }
        })
        .await;
        assert_eq!(result.as_deref(), Some("recovered"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn options_override_default_temperature() {
        let p = policy(2);
        assert!((p.resolve_temperature(None) - 0.7).abs() < f64::EPSILON);
        let opts = ChatOptions {
            temperature: Some(0.2),
        };
        assert!((p.resolve_temperature(Some(&opts)) - 0.2).abs() < f64::EPSILON);
        let empty = ChatOptions::default();
        assert!((p.resolve_temperature(Some(&empty)) - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn message_constructors_tag_roles() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn roles_serialize_snake_case() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
        assert!(json.contains("\"content\":\"hi\""));
    }
}
