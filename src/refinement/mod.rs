//! The supervised refinement loop: assess content into typed suggestions,
//! let the user decide, revise against what they accepted, and track the
//! round history in a single persisted state document.

pub mod assess;
pub mod parser;
pub mod revise;
pub mod store;
pub mod types;

pub use assess::{AssessInput, run_assess};
pub use parser::parse_suggestions;
pub use revise::{ReviseInput, run_revise};
pub use store::RefinementStore;
pub use types::{
    DEFAULT_MAX_ROUNDS, RefinementMode, RefinementPhase, RefinementRound, RefinementScope,
    RefinementState, RefinementStateFile, RefinementSuggestion, Severity, SuggestionType,
    UserDecision,
};
