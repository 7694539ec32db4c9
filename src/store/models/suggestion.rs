// Store models - AI suggestions
//
// Shapes the AI collaborator proposes before anything is committed to the
// store: suggested codes for a selection, and detected themes (a code plus
// example quote texts).

use serde::{Deserialize, Serialize};

/// Id prefix marking a suggested code that does not exist in the store yet
pub const NEW_CODE_PREFIX: &str = "new-";

/// Neutral chip color for not-yet-created suggestions
pub const NEW_CODE_COLOR: &str = "#E2E8F0";

/// A code the assistant suggests applying to the current selection.
///
/// Existing codes keep their store id and wear their real color; synthetic
/// ones carry a `new-` id and the placeholder color until created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestedCode {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "placeholder_color")]
    pub color: String,
}

fn placeholder_color() -> String {
    NEW_CODE_COLOR.to_string()
}

impl SuggestedCode {
    /// True for codes the assistant invented rather than picked from the store
    pub fn is_new(&self) -> bool {
        self.id.starts_with(NEW_CODE_PREFIX)
    }
}

/// Name and description of a theme's proposed code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeCode {
    pub name: String,
    pub description: String,
}

/// A theme detected in a document: a proposed code plus verbatim example
/// quotes, not yet materialized into the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestedTheme {
    pub code: ThemeCode,
    pub quotes: Vec<String>,
}
