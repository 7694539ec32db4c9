// Codes - creation with palette colors, partial update, deletion with cascade

use super::models::{Code, CodeUpdate};
use super::palette;
use super::AnnotationStore;

impl AnnotationStore {
    /// Create a code, coloring it from the rotating palette indexed by the
    /// current code count.
    pub fn add_code(&mut self, name: &str, description: &str) -> Code {
        let color = palette::color_for_index(self.codes.len());
        let code = Code::new(name, description, color);
        self.codes.push(code.clone());
        code
    }

    /// Rename and/or redescribe a code. The color is immutable after
    /// creation and is never touched here.
    pub fn update_code(&mut self, id: &str, update: CodeUpdate) -> bool {
        match self.codes.iter_mut().find(|c| c.id == id) {
            Some(code) => {
                if let Some(name) = update.name {
                    code.name = name;
                }
                if let Some(description) = update.description {
                    code.description = description;
                }
                true
            }
            None => false,
        }
    }

    /// Delete a code and every quote that references it. Callers that want
    /// to keep the quotes reassign them first.
    pub fn delete_code(&mut self, id: &str) -> bool {
        let before = self.codes.len();
        self.codes.retain(|c| c.id != id);
        if self.codes.len() == before {
            return false;
        }

        let quotes_before = self.quotes.len();
        self.quotes.retain(|q| q.code_id != id);
        let cascaded = quotes_before - self.quotes.len();
        if cascaded > 0 {
            log::debug!("deleted code {} and {} dependent quotes", id, cascaded);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{NewDocument, Segment};
    use crate::store::palette::PALETTE;

    #[test]
    fn test_nth_code_gets_nth_palette_color() {
        let mut store = AnnotationStore::new();
        for n in 0..PALETTE.len() + 2 {
            let code = store.add_code(&format!("Code {}", n), "");
            assert_eq!(code.color, PALETTE[n % PALETTE.len()]);
        }
    }

    #[test]
    fn test_color_index_drifts_after_deletion() {
        let mut store = AnnotationStore::new();
        let first = store.add_code("First", "");
        store.add_code("Second", "");
        store.delete_code(&first.id);

        // One code left, so the next assignment uses index 1, not 2.
        let third = store.add_code("Third", "");
        assert_eq!(third.color, PALETTE[1]);
    }

    #[test]
    fn test_update_code_leaves_color_untouched() {
        let mut store = AnnotationStore::new();
        let code = store.add_code("Usability", "friction points");
        let original_color = code.color.clone();

        assert!(store.update_code(
            &code.id,
            CodeUpdate {
                name: Some("Usability friction".to_string()),
                description: Some("places users struggled".to_string()),
            },
        ));

        let updated = store.code(&code.id).unwrap();
        assert_eq!(updated.name, "Usability friction");
        assert_eq!(updated.description, "places users struggled");
        assert_eq!(updated.color, original_color);
    }

    #[test]
    fn test_partial_update_only_touches_given_fields() {
        let mut store = AnnotationStore::new();
        let code = store.add_code("Trust", "confidence in the product");

        store.update_code(&code.id, CodeUpdate::rename("Confidence"));
        let updated = store.code(&code.id).unwrap();
        assert_eq!(updated.name, "Confidence");
        assert_eq!(updated.description, "confidence in the product");
    }

    #[test]
    fn test_delete_code_cascades_to_quotes() {
        let mut store = AnnotationStore::new();
        let doc = store.add_document(NewDocument::text("Interview", "words to keep and cut"));
        let kept = store.add_code("Keep", "");
        let doomed = store.add_code("Cut", "");

        store.add_quote(&doc.id, &kept.id, &Segment::new("words", 0));
        store.add_quote(&doc.id, &doomed.id, &Segment::new("keep", 9));
        store.add_quote(&doc.id, &doomed.id, &Segment::new("cut", 18));

        assert!(store.delete_code(&doomed.id));
        assert_eq!(store.codes().len(), 1);
        assert_eq!(store.quotes().len(), 1);
        assert_eq!(store.quotes()[0].code_id, kept.id);
    }
}
