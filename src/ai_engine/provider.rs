//! AI collaborator trait and types
//!
//! Defines the common interface the core uses to reach a generative-AI
//! backend: code suggestion for a selection, theme detection in a
//! document, media transcription, and free-text questions over the corpus.
//! The core never talks to a backend directly, so everything above this
//! boundary is testable with a scripted provider.

use async_trait::async_trait;
use std::fmt;

use crate::store::models::{
    ChatMessage, Code, Document, Quote, Segment, SuggestedCode, SuggestedTheme,
};

/// Error types for AI collaborator operations
#[derive(Debug, Clone)]
pub enum AiError {
    /// API key missing or rejected
    MissingApiKey,
    /// Request failed (network, timeout, non-success status)
    RequestFailed(String),
    /// The model's reply could not be parsed into the expected shape
    InvalidResponse(String),
    /// The request was invalid before it left (bad data URL, empty input)
    InvalidRequest(String),
    /// The operation does not apply to this document type
    UnsupportedDocument(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::MissingApiKey => {
                write!(f, "API key not set. Configure it to use AI features.")
            }
            AiError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            AiError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            AiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AiError::UnsupportedDocument(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AiError {}

/// Decoded `data:` URL payload for a media document
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub mime_type: String,
    pub base64_data: String,
}

impl MediaPayload {
    /// Split a `data:<mime>;base64,<data>` URL and check the payload is
    /// something transcribable. Only audio and video make it past this
    /// boundary; everything else is rejected before a request is built.
    pub fn from_data_url(data_url: &str) -> Result<Self, AiError> {
        let (header, data) = data_url.split_once(',').ok_or_else(|| {
            AiError::InvalidRequest("Invalid data URL format for transcription.".to_string())
        })?;

        let mime_type = header
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("");

        if !(mime_type.starts_with("audio/") || mime_type.starts_with("video/")) {
            return Err(AiError::InvalidRequest(format!(
                "Unsupported MIME type for transcription: {}",
                mime_type,
            )));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            base64_data: data.to_string(),
        })
    }
}

/// The trait every AI backend must implement
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Backend name (e.g. "gemini")
    fn provider_name(&self) -> &'static str;

    /// Suggest codes for a selected segment, given the full document for
    /// context and the codes that already exist. Existing codes come back
    /// under their real ids; invented ones carry the `new-` sentinel id.
    async fn suggest_codes(
        &self,
        segment: &Segment,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedCode>, AiError>;

    /// Detect the major themes in a document: proposed codes plus verbatim
    /// example quotes. Only ever called for text documents; the engine
    /// rejects everything else first.
    async fn detect_themes(
        &self,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedTheme>, AiError>;

    /// Produce a verbatim transcript of an audio/video payload
    async fn transcribe_media(&self, media: &MediaPayload) -> Result<String, AiError>;

    /// Answer a free-text question given the chat history and the corpus
    async fn answer_question(
        &self,
        question: &str,
        history: &[ChatMessage],
        documents: &[Document],
        codes: &[Code],
        quotes: &[Quote],
    ) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_data_url_parses() {
        let payload = MediaPayload::from_data_url("data:audio/mp3;base64,SGVsbG8=").unwrap();
        assert_eq!(payload.mime_type, "audio/mp3");
        assert_eq!(payload.base64_data, "SGVsbG8=");
    }

    #[test]
    fn test_video_data_url_parses() {
        let payload = MediaPayload::from_data_url("data:video/mp4;base64,AAAA").unwrap();
        assert_eq!(payload.mime_type, "video/mp4");
    }

    #[test]
    fn test_data_url_without_comma_is_rejected() {
        assert!(matches!(
            MediaPayload::from_data_url("data:audio/mp3;base64"),
            Err(AiError::InvalidRequest(_)),
        ));
    }

    #[test]
    fn test_non_media_mime_type_is_rejected() {
        let err = MediaPayload::from_data_url("data:image/png;base64,AAAA").unwrap_err();
        assert!(matches!(err, AiError::InvalidRequest(msg) if msg.contains("image/png")));
    }

    #[test]
    fn test_missing_data_prefix_is_rejected() {
        assert!(MediaPayload::from_data_url("audio/mp3;base64,AAAA").is_err());
    }
}
