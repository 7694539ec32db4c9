// Store models - Re-exports all domain-specific models
//
// This module is split into focused files by domain:
// - document.rs: Imported source material (text, image, audio, video)
// - code.rs: Researcher-defined codes (colored tags)
// - quote.rs: Coded spans, comments, and the transient selection segment
// - chat.rs: Assistant chat messages
// - suggestion.rs: AI-proposed codes and themes, not yet in the store

mod chat;
mod code;
mod document;
mod quote;
mod suggestion;

pub use chat::{ChatMessage, ChatSender};
pub use code::{Code, CodeUpdate};
pub use document::{Document, DocumentMetadata, DocumentType, NewDocument};
pub use quote::{Comment, MediaRegion, MediaTimestamp, Quote, Segment};
pub use suggestion::{
    SuggestedCode, SuggestedTheme, ThemeCode, NEW_CODE_COLOR, NEW_CODE_PREFIX,
};

/// Short prefixed id, e.g. `doc_3f9a1c2b4d5e`
pub(crate) fn prefixed_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_id_shape() {
        let id = prefixed_id("doc");
        assert!(id.starts_with("doc_"));
        assert_eq!(id.len(), "doc_".len() + 12);
    }

    #[test]
    fn test_prefixed_ids_are_unique() {
        assert_ne!(prefixed_id("code"), prefixed_id("code"));
    }
}
