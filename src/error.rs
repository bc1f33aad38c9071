use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for storyloom.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
///
/// Most of the chat surface deliberately does NOT return errors: transport and
/// parse problems degrade to defined fallback values instead. The variants
/// here cover the places where a failure must reach the caller — loading
/// configuration and writing persisted state.
#[derive(Debug, Error)]
pub enum StoryloomError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Persisted refinement state / content documents ──────────────────
    #[error("state: {0}")]
    State(#[from] StateError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── State / content persistence errors ─────────────────────────────────────

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("failed to encode state: {0}")]
    Encode(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, StoryloomError>;
