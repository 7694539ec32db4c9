// State management for Coda-Local

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::ai_engine::{AiEngine, AiError};
use crate::session::Workspace;
use crate::store::models::{ChatMessage, Document, NewDocument, SuggestedCode, SuggestedTheme};
use crate::store::{snapshot, AnnotationStore, ThemePlan};

/// Shared application state: the workspace behind a lock, the AI engine
/// beside it.
///
/// Every mutation takes the write guard for one synchronous change and
/// releases it before anything is awaited, so collaborator calls never
/// block work on other documents and no two mutations interleave.
pub struct AppState {
    workspace: Arc<RwLock<Workspace>>,
    ai_engine: Arc<AiEngine>,
}

impl AppState {
    pub fn new(ai_engine: AiEngine) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(Workspace::new())),
            ai_engine: Arc::new(ai_engine),
        }
    }

    /// Handle to the workspace, for callers that render or mutate directly
    pub fn workspace(&self) -> Arc<RwLock<Workspace>> {
        self.workspace.clone()
    }

    /// Import a document and open it. Text and image documents are
    /// complete immediately. Audio/video documents with content are
    /// inserted optimistically, flagged as transcribing, and a background
    /// transcription is kicked off; the user keeps working meanwhile.
    pub async fn add_document(&self, new: NewDocument) -> Document {
        let needs_transcription = new.doc_type.is_media() && !new.content.is_empty();

        let mut document = {
            let mut workspace = self.workspace.write().await;
            let document = workspace.add_document(new);
            if needs_transcription {
                workspace.store_mut().begin_transcription(&document.id);
            }
            document
        };

        if needs_transcription {
            document.is_transcribing = true;
            let workspace = self.workspace.clone();
            let engine = self.ai_engine.clone();
            let target = document.clone();
            tokio::spawn(async move {
                run_transcription(workspace, engine, target).await;
            });
        }

        document
    }

    /// Ask the collaborator for code suggestions for the current selection
    pub async fn suggest_codes(&self) -> Result<Vec<SuggestedCode>, AiError> {
        let (segment, document, codes) = {
            let workspace = self.workspace.read().await;
            let segment = workspace
                .selected_segment()
                .cloned()
                .ok_or_else(|| AiError::InvalidRequest("No text is selected.".to_string()))?;
            let document = workspace
                .active_document()
                .cloned()
                .ok_or_else(|| AiError::InvalidRequest("No document is open.".to_string()))?;
            (segment, document, workspace.store().codes().to_vec())
        };

        self.ai_engine
            .suggest_codes(&segment, &document, &codes)
            .await
    }

    /// Detect themes in the open document
    pub async fn detect_themes(&self) -> Result<Vec<SuggestedTheme>, AiError> {
        let (document, codes) = {
            let workspace = self.workspace.read().await;
            let document = workspace
                .active_document()
                .cloned()
                .ok_or_else(|| AiError::InvalidRequest("No document is open.".to_string()))?;
            (document, workspace.store().codes().to_vec())
        };

        self.ai_engine.detect_themes(&document, &codes).await
    }

    /// Materialize detected themes into the open document. Returns what
    /// was added, or `None` when no document is open.
    pub async fn apply_detected_themes(&self, themes: &[SuggestedTheme]) -> Option<ThemePlan> {
        let mut workspace = self.workspace.write().await;
        let document_id = workspace.active_document_id()?.to_string();
        Some(workspace.store_mut().apply_themes(themes, &document_id))
    }

    /// One chat turn: record the question, ask the collaborator with the
    /// corpus as context, record the reply. A failed call becomes an
    /// `Error: …` message in the log and the store is left exactly as it
    /// was before the call.
    pub async fn send_chat_message(&self, message: &str) -> ChatMessage {
        let (history, documents, codes, quotes) = {
            let mut workspace = self.workspace.write().await;
            workspace.push_chat_message(ChatMessage::user(message));
            let history = workspace.chat_log().to_vec();
            let store = workspace.store();
            (
                history,
                store.documents().to_vec(),
                store.codes().to_vec(),
                store.quotes().to_vec(),
            )
        };

        let reply = match self
            .ai_engine
            .answer_question(message, &history, &documents, &codes, &quotes)
            .await
        {
            Ok(text) => ChatMessage::ai(text),
            Err(e) => {
                log::error!("chat request failed: {}", e);
                ChatMessage::ai(format!("Error: {}", e))
            }
        };

        let mut workspace = self.workspace.write().await;
        workspace.push_chat_message(reply.clone());
        reply
    }

    /// Write the project snapshot to disk
    pub async fn save_project(&self, path: &Path) -> Result<()> {
        let snapshot = self.workspace.read().await.store().snapshot();
        snapshot::save_snapshot(&snapshot, path)
    }

    /// Replace the workspace with a project loaded from disk
    pub async fn load_project(&self, path: &Path) -> Result<()> {
        let loaded = snapshot::load_snapshot(path)?;
        let mut workspace = self.workspace.write().await;
        *workspace = Workspace::with_store(AnnotationStore::restore(loaded));
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AiEngine::new())
    }
}

/// Land a transcription result on the document it was started for.
///
/// The update is addressed by the stable document id: if the user has
/// moved on to another document the result still lands on its original
/// target, and if that document was deleted the result is dropped. A
/// failure clears the in-progress flag so the document never sticks in a
/// transcribing state.
async fn run_transcription(
    workspace: Arc<RwLock<Workspace>>,
    engine: Arc<AiEngine>,
    document: Document,
) {
    let result = engine.transcribe_document(&document).await;

    let mut workspace = workspace.write().await;
    match result {
        Ok(transcript) => {
            log::info!("transcription finished for {}", document.id);
            workspace
                .store_mut()
                .set_transcription_result(&document.id, Some(transcript));
        }
        Err(e) => {
            log::error!("Transcription failed for {}: {}", document.title, e);
            workspace
                .store_mut()
                .set_transcription_result(&document.id, None);
        }
    }
}
