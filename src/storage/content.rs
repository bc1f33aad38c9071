//! Phase content documents.
//!
//! Each wired phase owns one JSON document holding at minimum a `text` field.
//! The revise stage writes that field; sibling fields other tools may have
//! added are preserved across rewrites.

use super::layout::ProjectLayout;
use crate::error::StateError;
use crate::refinement::RefinementPhase;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub text: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub struct ContentStore {
    layout: ProjectLayout,
}

impl ContentStore {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Read a phase's content text. Missing or undecodable documents degrade
    /// to `None`, logged like the state store.
    pub fn read_text(&self, phase: RefinementPhase) -> Option<String> {
        let path = self.layout.content_path(phase);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "content document unreadable");
                return None;
            }
        };
        match serde_json::from_str::<ContentDocument>(&raw) {
            Ok(doc) => Some(doc.text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "content document failed decode");
                None
            }
        }
    }

    /// Write a phase's content text, keeping any sibling fields the document
    /// already carried.
    pub fn write_text(&self, phase: RefinementPhase, text: &str) -> Result<(), StateError> {
        let path = self.layout.content_path(phase);
        let extra = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<ContentDocument>(&raw).ok())
            .map(|doc| doc.extra)
            .unwrap_or_default();
        let doc = ContentDocument {
            text: text.to_string(),
            extra,
        };
        let encoded = serde_json::to_string_pretty(&doc)
            .map_err(|e| StateError::Encode(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, encoded).map_err(|e| {
            warn!(path = %path.display(), error = %e, "content write failed");
            StateError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ContentStore {
        ContentStore::new(ProjectLayout::new(dir.path()))
    }

    #[test]
    fn missing_document_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).read_text(RefinementPhase::Final).is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .write_text(RefinementPhase::Final, "Once upon a time.")
            .unwrap();
        assert_eq!(
            store.read_text(RefinementPhase::Final).as_deref(),
            Some("Once upon a time.")
        );
    }

    #[test]
    fn rewrite_preserves_sibling_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = ProjectLayout::new(dir.path()).content_path(RefinementPhase::Brief);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"text":"old","wordTarget":800,"audience":"ages 8-10"}"#,
        )
        .unwrap();

        store.write_text(RefinementPhase::Brief, "new").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["text"], "new");
        assert_eq!(value["wordTarget"], 800);
        assert_eq!(value["audience"], "ages 8-10");
    }

    #[test]
    fn corrupt_document_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = ProjectLayout::new(dir.path()).content_path(RefinementPhase::Final);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(store.read_text(RefinementPhase::Final).is_none());
    }

    #[test]
    fn document_without_text_field_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = ProjectLayout::new(dir.path()).content_path(RefinementPhase::Final);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"title":"no body yet"}"#).unwrap();
        assert!(store.read_text(RefinementPhase::Final).is_none());
    }
}
