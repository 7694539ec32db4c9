// Span resolver - renders a document as an ordered sequence of runs
//
// The one piece of this system with real invariants: possibly-overlapping
// coded quotes over immutable text must come out as a deterministic,
// non-overlapping run sequence.

use serde::Serialize;

use crate::perf_debug;
use crate::store::models::{Code, Quote};

use super::contrast::{text_color_for, TextColor};

/// One contiguous piece of rendered document output
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Run {
    /// Uncoded text between highlights
    Plain { text: String },
    /// A highlighted span carrying its quote, code, and background color
    Coded {
        text: String,
        quote_id: String,
        code_id: String,
        color: String,
    },
}

impl Run {
    pub fn text(&self) -> &str {
        match self {
            Run::Plain { text } => text,
            Run::Coded { text, .. } => text,
        }
    }

    /// Legible foreground over this run's background. Plain runs sit on
    /// the page background and read as black text.
    pub fn text_color(&self) -> TextColor {
        match self {
            Run::Plain { .. } => TextColor::Black,
            Run::Coded { color, .. } => text_color_for(color),
        }
    }
}

/// Resolve a document's text and its quotes into ordered runs.
///
/// Quotes without offsets (image regions, media timestamps) are not
/// renderable as text runs and are ignored, as is any quote whose offsets
/// cannot slice `text`. The rest are walked in `start` order — ties keep
/// input order — with a cursor over the text:
///
/// - uncovered text before a quote becomes a `Plain` run;
/// - a quote whose code is missing emits nothing but still consumes its
///   range, so an orphan renders as nothing rather than garbling the
///   output around it;
/// - overlapping quotes never double-emit: a later-ending quote covers
///   whatever the earlier ones left, and a quote nested entirely inside
///   already-covered text is suppressed outright.
///
/// With no renderable quotes the whole text comes back as a single
/// `Plain` run, which guarantees a render even before any codes exist.
/// Whenever every quote's code resolves, the run texts concatenate back
/// to `text` exactly.
pub fn resolve_runs(text: &str, quotes: &[Quote], codes: &[Code]) -> Vec<Run> {
    let mut spans: Vec<(usize, usize, &Quote)> = quotes
        .iter()
        .filter_map(|quote| {
            let (start, end) = quote.span()?;
            // get() rejects reversed, out-of-range, and non-boundary
            // offsets in one go; such a quote is simply not renderable.
            text.get(start..end)?;
            Some((start, end, quote))
        })
        .collect();

    if spans.is_empty() {
        return vec![Run::Plain {
            text: text.to_string(),
        }];
    }

    spans.sort_by_key(|&(start, _, _)| start);

    let mut runs = Vec::with_capacity(spans.len() * 2 + 1);
    let mut last_index = 0usize;

    for (start, end, quote) in spans {
        if start > last_index {
            runs.push(Run::Plain {
                text: text[last_index..start].to_string(),
            });
        }

        if let Some(code) = codes.iter().find(|c| c.id == quote.code_id) {
            let covered_from = start.max(last_index);
            if end > covered_from {
                runs.push(Run::Coded {
                    text: text[covered_from..end].to_string(),
                    quote_id: quote.id.clone(),
                    code_id: code.id.clone(),
                    color: code.color.clone(),
                });
            }
        }
        // No code: orphaned quote. Nothing is emitted, but the cursor
        // still moves past it below.

        last_index = last_index.max(end);
    }

    if last_index < text.len() {
        runs.push(Run::Plain {
            text: text[last_index..].to_string(),
        });
    }

    perf_debug!("resolved {} quotes into {} runs", quotes.len(), runs.len());
    runs
}
