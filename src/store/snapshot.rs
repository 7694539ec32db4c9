// Project snapshots - JSON save/load of the four entity collections
//
// The store itself is in-memory only; snapshots are how anything outside
// it persists a project. A snapshot is data at rest, so restoring one
// clears any in-flight transcription flag (no task exists to complete it).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::models::{Code, Comment, Document, Quote};
use super::AnnotationStore;

/// Serialized form of a whole project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectSnapshot {
    pub documents: Vec<Document>,
    pub codes: Vec<Code>,
    pub quotes: Vec<Quote>,
    pub comments: Vec<Comment>,
}

impl AnnotationStore {
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            documents: self.documents.clone(),
            codes: self.codes.clone(),
            quotes: self.quotes.clone(),
            comments: self.comments.clone(),
        }
    }

    pub fn restore(snapshot: ProjectSnapshot) -> Self {
        let mut documents = snapshot.documents;
        for document in &mut documents {
            document.is_transcribing = false;
        }
        Self {
            documents,
            codes: snapshot.codes,
            quotes: snapshot.quotes,
            comments: snapshot.comments,
        }
    }
}

/// Write a snapshot as pretty-printed JSON
pub fn save_snapshot(snapshot: &ProjectSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .context("Failed to serialize project snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
    log::info!("saved project snapshot to {}", path.display());
    Ok(())
}

/// Read a snapshot back from disk
pub fn load_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse project snapshot")
}
