// Quotes - coding selected segments, bulk reassignment

use super::models::{Quote, Segment};
use super::AnnotationStore;

impl AnnotationStore {
    /// Attach a code to a selected segment of a document.
    ///
    /// Callers only invoke this with a live segment whose offsets were
    /// produced against the document's offset source; documents are
    /// immutable after creation, so the offsets stay valid for the quote's
    /// lifetime. The invariant is asserted in debug builds rather than
    /// revalidated on every call.
    pub fn add_quote(&mut self, document_id: &str, code_id: &str, segment: &Segment) -> Quote {
        debug_assert!(segment.start <= segment.end);
        if let Some(source) = self.document(document_id).and_then(|d| d.offset_source()) {
            debug_assert_eq!(
                source.get(segment.start..segment.end),
                Some(segment.text.as_str()),
                "segment offsets must address the document's offset source",
            );
        }

        let quote = Quote::from_segment(document_id, code_id, segment);
        self.quotes.push(quote.clone());
        quote
    }

    /// Move every quote in `quote_ids` onto `new_code_id`, returning how
    /// many were moved. The destination is taken as given; the caller
    /// filters the choices it offers (the UI only lists codes other than
    /// the source code).
    pub fn reassign_quotes(&mut self, quote_ids: &[String], new_code_id: &str) -> usize {
        let mut moved = 0;
        for quote in self.quotes.iter_mut() {
            if quote_ids.iter().any(|id| id == &quote.id) {
                quote.code_id = new_code_id.to_string();
                moved += 1;
            }
        }
        moved
    }

    /// Quotes belonging to one document, in creation order
    pub fn quotes_for_document(&self, document_id: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|q| q.document_id == document_id)
            .collect()
    }

    /// Quotes currently carrying one code, in creation order
    pub fn quotes_for_code(&self, code_id: &str) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| q.code_id == code_id).collect()
    }
}
