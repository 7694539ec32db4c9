// Workspace - one live coding session over the annotation store

use crate::highlight::{resolve_runs, Run};
use crate::store::models::{
    ChatMessage, Code, Document, NewDocument, Quote, Segment, SuggestedCode,
};
use crate::store::AnnotationStore;

/// What acting on an AI suggestion did
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// A new code was created from the suggestion; nothing was applied yet
    CodeCreated(Code),
    /// An existing code was applied to the selection
    QuoteApplied(Quote),
    /// The suggestion resolved to nothing actionable
    Ignored,
}

/// One live coding session: the store plus the transient state around it —
/// the open document, the current uncoded selection, and the chat log.
///
/// Everything here is synchronous. The async layer in `state` takes a
/// write guard per event, so no two mutations ever interleave, and the
/// store is only ever touched through its own operations.
#[derive(Debug, Default)]
pub struct Workspace {
    store: AnnotationStore,
    active_document_id: Option<String>,
    selected_segment: Option<Segment>,
    chat_log: Vec<ChatMessage>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: AnnotationStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn active_document_id(&self) -> Option<&str> {
        self.active_document_id.as_deref()
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active_document_id
            .as_deref()
            .and_then(|id| self.store.document(id))
    }

    /// Open a document (or none). Switching away drops the live selection.
    pub fn select_document(&mut self, id: Option<&str>) {
        if self.active_document_id.as_deref() != id {
            self.selected_segment = None;
        }
        self.active_document_id = id.map(|s| s.to_string());
    }

    pub fn selected_segment(&self) -> Option<&Segment> {
        self.selected_segment.as_ref()
    }

    /// A new selection supersedes the previous one; `None` clears it
    pub fn set_selection(&mut self, segment: Option<Segment>) {
        self.selected_segment = segment;
    }

    /// Import a document and open it
    pub fn add_document(&mut self, new: NewDocument) -> Document {
        let document = self.store.add_document(new);
        self.select_document(Some(&document.id));
        document
    }

    /// Delete a document; when it was the open one, fall back to the first
    /// remaining document
    pub fn delete_document(&mut self, id: &str) -> bool {
        let deleted = self.store.delete_document(id);
        if deleted && self.active_document_id.as_deref() == Some(id) {
            let fallback = self.store.documents().first().map(|d| d.id.clone());
            self.select_document(fallback.as_deref());
        }
        deleted
    }

    /// Code the current selection. Needs an open document and a live
    /// segment; the segment is consumed on success.
    pub fn apply_code(&mut self, code_id: &str) -> Option<Quote> {
        let document_id = self.active_document_id.clone()?;
        let segment = self.selected_segment.take()?;
        Some(self.store.add_quote(&document_id, code_id, &segment))
    }

    /// Act on an AI suggestion the way the coding panel does: a `new-`
    /// suggestion whose name is not already taken creates the code and
    /// stops there (the researcher applies it explicitly afterwards);
    /// anything that resolves to an existing code — by name first, then by
    /// id — is applied to the selection directly.
    pub fn apply_suggestion(&mut self, suggestion: &SuggestedCode) -> SuggestionOutcome {
        let by_name = self
            .store
            .codes()
            .iter()
            .find(|c| c.name.to_lowercase() == suggestion.name.to_lowercase())
            .cloned();

        if suggestion.is_new() && by_name.is_none() {
            let code = self.store.add_code(&suggestion.name, &suggestion.description);
            return SuggestionOutcome::CodeCreated(code);
        }

        let target = by_name.or_else(|| self.store.code(&suggestion.id).cloned());
        match target {
            Some(code) => match self.apply_code(&code.id) {
                Some(quote) => SuggestionOutcome::QuoteApplied(quote),
                None => SuggestionOutcome::Ignored,
            },
            None => SuggestionOutcome::Ignored,
        }
    }

    /// Resolve the open document into highlight runs: its offset text and
    /// its quotes through the span resolver. Media documents render their
    /// transcript; a document with no offset source (an image, media still
    /// transcribing) has nothing to resolve yet.
    pub fn resolve_active_runs(&self) -> Vec<Run> {
        let Some(document) = self.active_document() else {
            return Vec::new();
        };
        let Some(text) = document.offset_source() else {
            return Vec::new();
        };

        let quotes: Vec<Quote> = self
            .store
            .quotes_for_document(&document.id)
            .into_iter()
            .cloned()
            .collect();
        resolve_runs(text, &quotes, self.store.codes())
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn push_chat_message(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NEW_CODE_COLOR;

    fn workspace_with_text(content: &str) -> (Workspace, Document) {
        let mut workspace = Workspace::new();
        let document = workspace.add_document(NewDocument::text("Interview", content));
        (workspace, document)
    }

    #[test]
    fn test_adding_a_document_opens_it() {
        let (workspace, document) = workspace_with_text("hello");
        assert_eq!(workspace.active_document_id(), Some(document.id.as_str()));
    }

    #[test]
    fn test_switching_documents_clears_the_selection() {
        let (mut workspace, first) = workspace_with_text("first text");
        workspace.set_selection(Some(Segment::new("first", 0)));

        let second = workspace
            .store_mut()
            .add_document(NewDocument::text("Second", "second text"));
        workspace.select_document(Some(&second.id));
        assert!(workspace.selected_segment().is_none());

        // Re-selecting the already-open document keeps the selection.
        workspace.set_selection(Some(Segment::new("second", 0)));
        workspace.select_document(Some(&second.id));
        assert!(workspace.selected_segment().is_some());

        workspace.select_document(Some(&first.id));
        assert!(workspace.selected_segment().is_none());
    }

    #[test]
    fn test_apply_code_consumes_the_selection() {
        let (mut workspace, document) = workspace_with_text("the design is great");
        let code = workspace.store_mut().add_code("Design", "");
        workspace.set_selection(Some(Segment::new("design", 4)));

        let quote = workspace.apply_code(&code.id).unwrap();
        assert_eq!(quote.document_id, document.id);
        assert_eq!(quote.span(), Some((4, 10)));
        assert!(workspace.selected_segment().is_none());

        // Without a selection there is nothing to apply.
        assert!(workspace.apply_code(&code.id).is_none());
    }

    #[test]
    fn test_deleting_the_open_document_falls_back_to_the_first_remaining() {
        let (mut workspace, first) = workspace_with_text("first");
        let second = workspace
            .store_mut()
            .add_document(NewDocument::text("Second", "second"));
        workspace.select_document(Some(&second.id));

        assert!(workspace.delete_document(&second.id));
        assert_eq!(workspace.active_document_id(), Some(first.id.as_str()));

        assert!(workspace.delete_document(&first.id));
        assert_eq!(workspace.active_document_id(), None);
    }

    #[test]
    fn test_deleting_a_background_document_keeps_the_open_one() {
        let (mut workspace, first) = workspace_with_text("first");
        let second = workspace
            .store_mut()
            .add_document(NewDocument::text("Second", "second"));

        workspace.select_document(Some(&first.id));
        workspace.delete_document(&second.id);
        assert_eq!(workspace.active_document_id(), Some(first.id.as_str()));
    }

    #[test]
    fn test_new_suggestion_creates_a_code_without_applying_it() {
        let (mut workspace, _) = workspace_with_text("the design is great");
        workspace.set_selection(Some(Segment::new("design", 4)));

        let outcome = workspace.apply_suggestion(&SuggestedCode {
            id: "new-0".to_string(),
            name: "Design".to_string(),
            description: "visual feedback".to_string(),
            color: NEW_CODE_COLOR.to_string(),
        });

        match outcome {
            SuggestionOutcome::CodeCreated(code) => assert_eq!(code.name, "Design"),
            other => panic!("expected CodeCreated, got {:?}", other),
        }
        assert_eq!(workspace.store().codes().len(), 1);
        assert!(workspace.store().quotes().is_empty());
        // The selection is still live for the explicit apply that follows.
        assert!(workspace.selected_segment().is_some());
    }

    #[test]
    fn test_new_suggestion_with_a_taken_name_applies_the_existing_code() {
        let (mut workspace, _) = workspace_with_text("the design is great");
        let existing = workspace.store_mut().add_code("design", "");
        workspace.set_selection(Some(Segment::new("design", 4)));

        let outcome = workspace.apply_suggestion(&SuggestedCode {
            id: "new-0".to_string(),
            name: "Design".to_string(),
            description: String::new(),
            color: NEW_CODE_COLOR.to_string(),
        });

        match outcome {
            SuggestionOutcome::QuoteApplied(quote) => assert_eq!(quote.code_id, existing.id),
            other => panic!("expected QuoteApplied, got {:?}", other),
        }
        assert_eq!(workspace.store().codes().len(), 1);
    }

    #[test]
    fn test_existing_suggestion_applies_by_id() {
        let (mut workspace, _) = workspace_with_text("the design is great");
        let existing = workspace.store_mut().add_code("Aesthetics", "");
        workspace.set_selection(Some(Segment::new("design", 4)));

        let outcome = workspace.apply_suggestion(&SuggestedCode {
            id: existing.id.clone(),
            name: "Visual design".to_string(),
            description: String::new(),
            color: existing.color.clone(),
        });

        assert!(matches!(outcome, SuggestionOutcome::QuoteApplied(_)));
    }

    #[test]
    fn test_active_document_resolves_to_runs() {
        let (mut workspace, document) = workspace_with_text("the design is great");
        let code = workspace.store_mut().add_code("Design", "");
        workspace.set_selection(Some(Segment::new("design", 4)));
        workspace.apply_code(&code.id).unwrap();

        // A quote on another document never shows up in this one's runs.
        let other = workspace
            .store_mut()
            .add_document(NewDocument::text("Other", "design elsewhere"));
        workspace
            .store_mut()
            .add_quote(&other.id, &code.id, &Segment::new("design", 0));
        workspace.select_document(Some(&document.id));

        let runs = workspace.resolve_active_runs();
        let joined: String = runs.iter().map(|r| r.text().to_string()).collect();
        assert_eq!(joined, "the design is great");
        assert_eq!(
            runs.iter()
                .filter(|r| matches!(r, crate::highlight::Run::Coded { .. }))
                .count(),
            1,
        );
    }

    #[test]
    fn test_nothing_open_resolves_to_no_runs() {
        let mut workspace = Workspace::new();
        assert!(workspace.resolve_active_runs().is_empty());

        // Media still transcribing has no offset source yet.
        let media = workspace.store_mut().add_document(NewDocument {
            title: "Recording".to_string(),
            doc_type: crate::store::models::DocumentType::Audio,
            content: "data:audio/mp3;base64,AAAA".to_string(),
            metadata: Default::default(),
        });
        workspace.select_document(Some(&media.id));
        assert!(workspace.resolve_active_runs().is_empty());
    }

    #[test]
    fn test_unresolvable_suggestion_is_ignored() {
        let (mut workspace, _) = workspace_with_text("text");
        let outcome = workspace.apply_suggestion(&SuggestedCode {
            id: "code_missing".to_string(),
            name: "Ghost".to_string(),
            description: String::new(),
            color: NEW_CODE_COLOR.to_string(),
        });
        assert_eq!(outcome, SuggestionOutcome::Ignored);
    }
}
