// Annotation store - owns the in-memory collections
//
// The relational model for a coding project: documents, codes, quotes, and
// comments, with the referential-integrity rules between them. Entity
// operations live in the per-domain files (documents.rs, codes.rs,
// quotes.rs, comments.rs); this file holds the store itself and the read
// accessors.

use super::models::{Code, Comment, Document, Quote};

/// In-memory relational model for a coding project.
///
/// The collections are only mutated through the methods on this type, and
/// every mutation is synchronous and runs to completion before the next
/// one starts, so callers never observe a partially-applied change.
/// Foreign keys are soft: deletions cascade to quotes at this boundary,
/// and the rendering layer stays defensive about any orphan that slips
/// through (comments are the known gap).
#[derive(Debug, Default)]
pub struct AnnotationStore {
    pub(super) documents: Vec<Document>,
    pub(super) codes: Vec<Code>,
    pub(super) quotes: Vec<Quote>,
    pub(super) comments: Vec<Comment>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn code(&self, id: &str) -> Option<&Code> {
        self.codes.iter().find(|c| c.id == id)
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn quote(&self, id: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}
