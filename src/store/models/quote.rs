// Store models - Quote, Comment, and the transient selection segment
use serde::{Deserialize, Serialize};

use super::prefixed_id;

/// Rectangular region on an image document, reserved for image quotes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MediaRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Time range inside an audio/video document, reserved for media quotes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MediaTimestamp {
    pub start: f64,
    pub end: f64,
}

/// A coded span of text within a document.
///
/// `start`/`end` are byte offsets into the document's offset source and are
/// only present for text spans; `region` and `timestamp` are carried for
/// image/media quotes but not interpreted by the text pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: String,
    pub document_id: String,
    pub code_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<MediaRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<MediaTimestamp>,
}

impl Quote {
    pub fn from_segment(document_id: &str, code_id: &str, segment: &Segment) -> Self {
        Self {
            id: prefixed_id("quote"),
            document_id: document_id.to_string(),
            code_id: code_id.to_string(),
            text: segment.text.clone(),
            start: Some(segment.start),
            end: Some(segment.end),
            region: None,
            timestamp: None,
        }
    }

    /// Both offsets, when this quote is a text span
    pub fn span(&self) -> Option<(usize, usize)> {
        self.start.zip(self.end)
    }
}

/// A note attached to a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub quote_id: String,
    pub text: String,
    /// ISO-8601 creation timestamp; comments display oldest first
    pub created_at: String,
}

impl Comment {
    pub fn new(quote_id: &str, text: &str) -> Self {
        Self {
            id: prefixed_id("comment"),
            quote_id: quote_id.to_string(),
            text: text.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A user text selection that has not been coded yet.
///
/// At most one segment is live at a time; it is superseded by the next
/// selection and cleared when a quote is applied or the active document
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(text: &str, start: usize) -> Self {
        Self {
            text: text.to_string(),
            start,
            end: start + text.len(),
        }
    }
}
