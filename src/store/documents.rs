// Documents - import, transcription bookkeeping, deletion with quote cascade

use super::models::{Document, NewDocument};
use super::AnnotationStore;

impl AnnotationStore {
    /// Import a document. Media documents start without a transcript; the
    /// caller flags them with `begin_transcription` when it kicks one off.
    pub fn add_document(&mut self, new: NewDocument) -> Document {
        let document = Document::new(new);
        self.documents.push(document.clone());
        document
    }

    /// Delete a document and every quote that references it. Comments on
    /// those quotes are left behind (see comments.rs).
    pub fn delete_document(&mut self, id: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        if self.documents.len() == before {
            return false;
        }

        let quotes_before = self.quotes.len();
        self.quotes.retain(|q| q.document_id != id);
        let cascaded = quotes_before - self.quotes.len();
        if cascaded > 0 {
            log::debug!("deleted document {} and {} dependent quotes", id, cascaded);
        }
        true
    }

    /// Mark a document as having a transcription in flight.
    pub fn begin_transcription(&mut self, id: &str) -> bool {
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                document.is_transcribing = true;
                true
            }
            None => false,
        }
    }

    /// Land a transcription result on the document it was started for.
    ///
    /// `transcript` is `Some` on success and `None` on failure; the
    /// in-progress flag is cleared either way so the document never sticks
    /// in a transcribing state. Returns false when the document was deleted
    /// while the request was in flight, in which case the result is
    /// dropped.
    pub fn set_transcription_result(&mut self, id: &str, transcript: Option<String>) -> bool {
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                if let Some(text) = transcript {
                    document.transcript = Some(text);
                }
                document.is_transcribing = false;
                true
            }
            None => {
                log::debug!("transcription result for deleted document {}, dropping", id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{DocumentMetadata, DocumentType, Segment};

    fn media_document() -> NewDocument {
        NewDocument {
            title: "Focus group audio".to_string(),
            doc_type: DocumentType::Audio,
            content: "data:audio/mp3;base64,AAAA".to_string(),
            metadata: DocumentMetadata::default(),
        }
    }

    #[test]
    fn test_delete_document_cascades_to_quotes() {
        let mut store = AnnotationStore::new();
        let kept = store.add_document(NewDocument::text("Kept", "some text here"));
        let doomed = store.add_document(NewDocument::text("Doomed", "other text here"));
        let code = store.add_code("Design", "");

        store.add_quote(&kept.id, &code.id, &Segment::new("some", 0));
        store.add_quote(&doomed.id, &code.id, &Segment::new("other", 0));
        store.add_quote(&doomed.id, &code.id, &Segment::new("text", 6));

        assert!(store.delete_document(&doomed.id));
        assert_eq!(store.documents().len(), 1);
        assert_eq!(store.quotes().len(), 1);
        assert_eq!(store.quotes()[0].document_id, kept.id);
    }

    #[test]
    fn test_delete_unknown_document_is_a_noop() {
        let mut store = AnnotationStore::new();
        store.add_document(NewDocument::text("Only", "text"));
        assert!(!store.delete_document("doc_missing"));
        assert_eq!(store.documents().len(), 1);
    }

    #[test]
    fn test_transcription_success_sets_transcript_and_clears_flag() {
        let mut store = AnnotationStore::new();
        let doc = store.add_document(media_document());
        store.begin_transcription(&doc.id);
        assert!(store.document(&doc.id).unwrap().is_transcribing);

        assert!(store.set_transcription_result(&doc.id, Some("hello world".to_string())));
        let doc = store.document(&doc.id).unwrap();
        assert_eq!(doc.transcript.as_deref(), Some("hello world"));
        assert!(!doc.is_transcribing);
    }

    #[test]
    fn test_transcription_failure_still_clears_flag() {
        let mut store = AnnotationStore::new();
        let doc = store.add_document(media_document());
        store.begin_transcription(&doc.id);

        assert!(store.set_transcription_result(&doc.id, None));
        let doc = store.document(&doc.id).unwrap();
        assert_eq!(doc.transcript, None);
        assert!(!doc.is_transcribing);
    }

    #[test]
    fn test_transcription_result_for_deleted_document_is_dropped() {
        let mut store = AnnotationStore::new();
        let doc = store.add_document(media_document());
        store.begin_transcription(&doc.id);
        store.delete_document(&doc.id);

        assert!(!store.set_transcription_result(&doc.id, Some("late".to_string())));
        assert!(store.documents().is_empty());
    }
}
