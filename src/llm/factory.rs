//! Client selection from configuration.
//!
//! Availability here is a syntactic configuration check only — no network
//! probing, no errors. An incompletely configured or unknown platform simply
//! yields `None` and the caller degrades.

use super::{ChatClient, DeepSeekClient, OllamaClient};
use crate::config::Config;
use tracing::debug;

/// Build the active chat client, or `None` when the configured platform is
/// unknown or missing required settings.
pub fn create_client(config: &Config) -> Option<Box<dyn ChatClient>> {
    let llm = &config.llm;
    let policy = llm.retry_policy();

    match llm.platform.as_str() {
        "deepseek" => {
            let Some(api_key) = llm.deepseek_api_key() else {
                debug!("deepseek selected but no API key configured");
                return None;
            };
            Some(Box::new(DeepSeekClient::new(
                &api_key,
                &llm.deepseek.model,
                policy,
            )))
        }
        "ollama" => {
            let base_url = llm.ollama.base_url.trim();
            let model = llm.ollama.model.trim();
            if base_url.is_empty() || model.is_empty() {
                debug!("ollama selected but base_url or model is blank");
                return None;
            }
            Some(Box::new(OllamaClient::new(base_url, model, policy)))
        }
        other => {
            debug!(platform = other, "unknown llm platform");
            None
        }
    }
}
