//! Refinement loop data model.
//!
//! The persisted file keeps the original camelCase field names and
//! epoch-millisecond timestamps so existing project state remains readable.

use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Advisory cap recorded in fresh state; no transition enforces it.
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// A named stage of the writing lifecycle the loop can be scoped to.
/// `Outline` and `Sample` are valid tags with no behavior attached yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefinementPhase {
    Brief,
    Outline,
    Sample,
    Final,
}

impl RefinementPhase {
    /// Whether assess/revise have behavior for this phase.
    pub fn is_wired(self) -> bool {
        matches!(self, Self::Brief | Self::Final)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuggestionType {
    Consistency,
    Completeness,
    Style,
    Safety,
    Logic,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    Suggestion,
    ShouldFix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDecision {
    AcceptAll,
    AcceptSelected,
    Reject,
    EditThenRetry,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementMode {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementScope {
    Full,
    Section,
}

/// One discrete, typed piece of feedback. `id` is unique within a round only;
/// stability across rounds is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementSuggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Exactly one assess-then-decide cycle. At most one round per phase is open
/// (undecided) at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementRound {
    pub round: u32,
    #[serde(with = "ts_milliseconds")]
    pub assessed_at: DateTime<Utc>,
    pub suggestions: Vec<RefinementSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_decision: Option<UserDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementState {
    pub phase: RefinementPhase,
    /// Count of completed assess cycles. Only ever incremented, once per
    /// assessment, until the phase is reinitialized.
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
    pub mode: RefinementMode,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_assessed_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_revised_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RefinementScope>,
}

impl RefinementState {
    pub fn new(phase: RefinementPhase) -> Self {
        Self {
            phase,
            round: 0,
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            mode: RefinementMode::Manual,
            last_assessed_at: None,
            last_revised_at: None,
            focus: None,
            scope: None,
        }
    }
}

/// The single persisted document: settled state plus, while a round is open,
/// the pending suggestions not yet folded into history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementStateFile {
    pub state: RefinementState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<RefinementRound>,
}
