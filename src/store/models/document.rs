// Store models - Document
use serde::{Deserialize, Serialize};

use super::prefixed_id;

/// Kind of source material a document holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Text,
    Image,
    Audio,
    Video,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Text => "text",
            DocumentType::Image => "image",
            DocumentType::Audio => "audio",
            DocumentType::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "image" => DocumentType::Image,
            "audio" => DocumentType::Audio,
            "video" => DocumentType::Video,
            _ => DocumentType::Text,
        }
    }

    /// Audio and video documents get a transcript instead of readable content
    pub fn is_media(&self) -> bool {
        matches!(self, DocumentType::Audio | DocumentType::Video)
    }
}

/// Extra document properties captured at import time
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    /// Media duration in seconds, where known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// A document in the project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Source text for text documents; a data URL for media
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub is_transcribing: bool,
}

/// Fields supplied when importing a document; the id is stamped by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(new: NewDocument) -> Self {
        Self {
            id: prefixed_id("doc"),
            title: new.title,
            doc_type: new.doc_type,
            content: new.content,
            metadata: new.metadata,
            transcript: None,
            is_transcribing: false,
        }
    }

    /// The text that quote offsets are measured against: `content` for text
    /// documents, the transcript for audio/video, nothing for images.
    pub fn offset_source(&self) -> Option<&str> {
        match self.doc_type {
            DocumentType::Text => Some(&self.content),
            DocumentType::Audio | DocumentType::Video => self.transcript.as_deref(),
            DocumentType::Image => None,
        }
    }
}

impl NewDocument {
    pub fn text(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            doc_type: DocumentType::Text,
            content: content.to_string(),
            metadata: DocumentMetadata::default(),
        }
    }
}
