//! Persisted refinement state.
//!
//! One JSON document per project, exclusively owned by this store. Reads
//! degrade to "no state" on a missing or undecodable file; writes surface
//! their failure to the caller and are not retried.

use super::types::{RefinementPhase, RefinementRound, RefinementState, RefinementStateFile};
use crate::error::StateError;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct RefinementStore {
    path: PathBuf,
}

impl RefinementStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the persisted state file. A missing file is `None`; a file that
    /// fails the schema decode is logged and treated the same way.
    pub fn read(&self) -> Option<RefinementStateFile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state file unreadable");
                return None;
            }
        };
        match serde_json::from_str::<RefinementStateFile>(&raw) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state file failed schema decode, treating as absent");
                None
            }
        }
    }

    pub fn write(&self, file: &RefinementStateFile) -> Result<(), StateError> {
        let encoded = serde_json::to_string_pretty(file)
            .map_err(|e| StateError::Encode(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(&e))?;
        }
        fs::write(&self.path, encoded).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "state write failed");
            self.write_error(&e)
        })
    }

    fn write_error(&self, e: &std::io::Error) -> StateError {
        StateError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }

    /// Enter (or start) refinement for a phase. Initializes fresh Idle state
    /// when nothing is persisted for this phase; idempotent otherwise.
    pub fn get_or_init(&self, phase: RefinementPhase) -> Result<RefinementStateFile, StateError> {
        if let Some(existing) = self.read() {
            if existing.state.phase == phase {
                return Ok(existing);
            }
            debug!(
                from = %existing.state.phase,
                to = %phase,
                "switching live refinement phase, reinitializing state"
            );
        }
        let file = RefinementStateFile {
            state: RefinementState::new(phase),
            current_round: None,
        };
        self.write(&file)?;
        Ok(file)
    }

    /// Record a completed assessment: increments `round` (the only transition
    /// that does), stamps `lastAssessedAt`, and stores the new suggestions as
    /// the open round — overwriting any still-undecided one.
    pub fn update_after_assess(
        &self,
        phase: RefinementPhase,
        suggestions: Vec<super::types::RefinementSuggestion>,
    ) -> Result<RefinementStateFile, StateError> {
        let mut file = self.get_or_init(phase)?;
        let assessed_at = Utc::now();
        let next_round = file.state.round + 1;
        file.state.round = next_round;
        file.state.last_assessed_at = Some(assessed_at);
        file.current_round = Some(RefinementRound {
            round: next_round,
            assessed_at,
            suggestions,
            user_decision: None,
            accepted_ids: None,
        });
        self.write(&file)?;
        Ok(file)
    }

    /// Record a completed revision: clears the open round and stamps
    /// `lastRevisedAt`; `round` is untouched. Falls back to `get_or_init`
    /// when no state exists for this phase.
    pub fn update_after_revise(
        &self,
        phase: RefinementPhase,
    ) -> Result<RefinementStateFile, StateError> {
        let Some(mut file) = self.read().filter(|f| f.state.phase == phase) else {
            return self.get_or_init(phase);
        };
        file.state.last_revised_at = Some(Utc::now());
        file.current_round = None;
        self.write(&file)?;
        Ok(file)
    }

    /// User abandons the pending suggestions without revising. No-op when the
    /// persisted state belongs to a different phase or is already settled.
    pub fn end_refinement(&self, phase: RefinementPhase) -> Result<(), StateError> {
        let Some(mut file) = self.read().filter(|f| f.state.phase == phase) else {
            return Ok(());
        };
        file.current_round = None;
        self.write(&file)
    }
}
