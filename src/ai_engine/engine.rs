//! AI engine - the core's single entry point to the collaborator
//!
//! Wraps whichever provider is configured and enforces the rules that hold
//! for every backend: theme detection and code suggestion only apply to
//! text documents, media content is validated before a request is built,
//! and suggestion colors are resolved against the store's codes.

use std::sync::Arc;

use crate::store::models::{
    ChatMessage, Code, Document, DocumentType, Quote, Segment, SuggestedCode, SuggestedTheme,
    NEW_CODE_COLOR,
};

use super::provider::{AiError, AiProvider, MediaPayload};
use super::providers::GeminiProvider;

pub struct AiEngine {
    provider: Arc<dyn AiProvider>,
}

impl AiEngine {
    /// Engine backed by the default Gemini provider, configured from the
    /// environment. Construction always succeeds; a missing API key only
    /// surfaces when a call is made.
    pub fn new() -> Self {
        Self::with_provider(Arc::new(GeminiProvider::from_env()))
    }

    pub fn with_provider(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Suggest codes for the selected segment.
    ///
    /// Suggestions for existing codes wear that code's real color; invented
    /// ones wear the neutral placeholder until they are created.
    pub async fn suggest_codes(
        &self,
        segment: &Segment,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedCode>, AiError> {
        if document.doc_type != DocumentType::Text {
            return Err(AiError::UnsupportedDocument(
                "AI analysis is not available for this document type.".to_string(),
            ));
        }

        let mut suggestions = self
            .provider
            .suggest_codes(segment, document, existing_codes)
            .await?;

        for suggestion in &mut suggestions {
            suggestion.color = existing_codes
                .iter()
                .find(|c| c.id == suggestion.id)
                .map(|c| c.color.clone())
                .unwrap_or_else(|| NEW_CODE_COLOR.to_string());
        }

        Ok(suggestions)
    }

    /// Detect themes in a document. Fails with an explicit error for
    /// non-text documents regardless of backend.
    pub async fn detect_themes(
        &self,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedTheme>, AiError> {
        if document.doc_type != DocumentType::Text {
            return Err(AiError::UnsupportedDocument(
                "Theme detection is currently only supported for text documents.".to_string(),
            ));
        }

        self.provider.detect_themes(document, existing_codes).await
    }

    /// Transcribe a media document's content (a data URL). Validation of
    /// the payload happens here, before any provider is involved.
    pub async fn transcribe_document(&self, document: &Document) -> Result<String, AiError> {
        let payload = MediaPayload::from_data_url(&document.content)?;
        self.provider.transcribe_media(&payload).await
    }

    pub async fn answer_question(
        &self,
        question: &str,
        history: &[ChatMessage],
        documents: &[Document],
        codes: &[Code],
        quotes: &[Quote],
    ) -> Result<String, AiError> {
        self.provider
            .answer_question(question, history, documents, codes, quotes)
            .await
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new()
    }
}
