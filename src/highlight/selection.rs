// Selection-to-segment mapping

use crate::store::models::Segment;

use super::locate::locate;

/// What the rendering layer knows about where a selection started.
///
/// When the selection begins exactly at a content boundary the renderer
/// recognizes (the start of a run it emitted), it passes the logical
/// offset of that boundary; otherwise the offset is unknown and the
/// mapper falls back to searching.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionContext {
    pub structural_offset: Option<usize>,
}

impl SelectionContext {
    pub fn at_offset(offset: usize) -> Self {
        Self {
            structural_offset: Some(offset),
        }
    }
}

/// Map a raw text selection onto the document's logical text.
///
/// Empty and whitespace-only selections yield no segment. A structural
/// offset is used directly when the logical text at that offset really is
/// the selected text; in every other case the selection is located by
/// first-occurrence search, so selecting the second copy of repeated text
/// maps to the first copy. That approximation is a known limitation kept
/// for compatibility with how selections have always resolved, not a bug
/// to fix here.
pub fn map_selection(
    raw_text: &str,
    context: &SelectionContext,
    full_text: &str,
) -> Option<Segment> {
    if raw_text.trim().is_empty() {
        return None;
    }

    let start = match context.structural_offset {
        Some(offset)
            if offset
                .checked_add(raw_text.len())
                .and_then(|end| full_text.get(offset..end))
                == Some(raw_text) =>
        {
            offset
        }
        _ => locate(raw_text, full_text)?,
    };

    Some(Segment::new(raw_text, start))
}
