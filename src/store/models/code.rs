// Store models - Code
use serde::{Deserialize, Serialize};

use super::prefixed_id;

/// A researcher-defined tag applied to quotes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Code {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Assigned from the rotating palette at creation time; never updated
    pub color: String,
}

impl Code {
    pub fn new(name: &str, description: &str, color: &str) -> Self {
        Self {
            id: prefixed_id("code"),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
        }
    }
}

/// Partial update for a code; the color cannot be changed
#[derive(Debug, Clone, Default)]
pub struct CodeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CodeUpdate {
    pub fn rename(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}
