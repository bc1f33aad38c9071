//! Fixed project-relative paths.
//!
//! Everything storyloom persists lives under a hidden directory at the
//! project root; hosts only ever hand us the root.

use crate::refinement::RefinementPhase;
use std::path::{Path, PathBuf};

pub const PROJECT_DIR: &str = ".storyloom";
pub const STATE_FILE: &str = "refinement_state.json";

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Path of the persisted refinement state document.
    pub fn state_path(&self) -> PathBuf {
        self.project_dir().join(STATE_FILE)
    }

    /// Path of the content document owning a phase's text.
    pub fn content_path(&self, phase: RefinementPhase) -> PathBuf {
        self.project_dir().join(format!("{phase}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted_under_project_dir() {
        let layout = ProjectLayout::new("/work/novel");
        assert_eq!(
            layout.state_path(),
            PathBuf::from("/work/novel/.storyloom/refinement_state.json")
        );
        assert_eq!(
            layout.content_path(RefinementPhase::Final),
            PathBuf::from("/work/novel/.storyloom/final.json")
        );
        assert_eq!(
            layout.content_path(RefinementPhase::Brief),
            PathBuf::from("/work/novel/.storyloom/brief.json")
        );
    }
}
