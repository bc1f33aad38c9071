//! Project configuration.
//!
//! Loaded explicitly from a TOML file and passed by reference to whatever
//! needs it; there is no global accessor. Every field has a serde default so
//! an empty file (or no file at all) yields a usable configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Active backend platform identifier ("deepseek" or "ollama").
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per chat call, including the first one.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Sampling temperature used when the caller passes none.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default)]
    pub deepseek: DeepSeekConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_deepseek_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_platform() -> String {
    "deepseek".into()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_temperature() -> f64 {
    0.7
}

fn default_deepseek_model() -> String {
    DEFAULT_DEEPSEEK_MODEL.into()
}

fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.into()
}

fn default_ollama_base_url() -> String {
    DEFAULT_OLLAMA_BASE_URL.into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            temperature: default_temperature(),
            deepseek: DeepSeekConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_deepseek_model(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "llm.retry_attempts must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation(format!(
                "llm.temperature {} outside [0.0, 2.0]",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

impl LlmConfig {
    /// Resolve the hosted-backend credential: explicit config first, then the
    /// `DEEPSEEK_API_KEY` environment variable. Blank values count as absent.
    pub fn deepseek_api_key(&self) -> Option<String> {
        if let Some(key) = self
            .deepseek
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        {
            return Some(key.to_string());
        }
        std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Snapshot of the retry knobs shared by every chat client.
    pub fn retry_policy(&self) -> crate::llm::RetryPolicy {
        crate::llm::RetryPolicy {
            attempts: self.retry_attempts,
            timeout: Duration::from_secs(self.timeout_secs),
            default_temperature: self.temperature,
        }
    }
}
