#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod error;
pub mod llm;
pub mod notify;
pub mod refinement;
pub mod storage;

pub use config::Config;
pub use error::{Result, StoryloomError};
pub use llm::{ChatClient, ChatMessage, ChatOptions, ChatRole, create_client};
pub use notify::{LogNotifier, Notifier};
pub use refinement::{
    AssessInput, RefinementPhase, RefinementState, RefinementStateFile, RefinementStore,
    RefinementSuggestion, ReviseInput, run_assess, run_revise,
};
pub use storage::{ContentStore, ProjectLayout};
