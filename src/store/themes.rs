// Theme application - materialize AI-detected themes into codes and quotes

use crate::highlight::locate;

use super::models::{Code, Quote, Segment, SuggestedTheme};
use super::palette;
use super::AnnotationStore;

/// Codes and quotes produced from a batch of suggested themes
#[derive(Debug, Clone, Default)]
pub struct ThemePlan {
    pub codes: Vec<Code>,
    pub quotes: Vec<Quote>,
}

/// Turn suggested themes into concrete codes and quotes against `source_text`.
///
/// Colors continue the palette rotation from `existing_code_count`, so a
/// multi-theme batch stays unique-by-rotation even though nothing has been
/// committed mid-batch. Each theme quote is resolved to offsets by
/// first-occurrence search; a quote the model paraphrased (no verbatim
/// match) is dropped on its own, and the theme's code and remaining quotes
/// still apply. Theme detection is best-effort, so partial application
/// never escalates to a batch failure.
pub fn plan_themes(
    themes: &[SuggestedTheme],
    source_text: &str,
    document_id: &str,
    existing_code_count: usize,
) -> ThemePlan {
    let mut plan = ThemePlan::default();

    for (theme_index, theme) in themes.iter().enumerate() {
        let color = palette::color_for_index(existing_code_count + theme_index);
        let code = Code::new(&theme.code.name, &theme.code.description, color);

        for quote_text in &theme.quotes {
            match locate(quote_text, source_text) {
                Some(start) => {
                    let segment = Segment::new(quote_text, start);
                    plan.quotes
                        .push(Quote::from_segment(document_id, &code.id, &segment));
                }
                None => {
                    log::debug!(
                        "theme '{}': no verbatim match for a {}-char quote, dropping it",
                        theme.code.name,
                        quote_text.len(),
                    );
                }
            }
        }

        plan.codes.push(code);
    }

    plan
}

impl AnnotationStore {
    /// Apply detected themes to a document and return what was added.
    ///
    /// A document with no offset source (unknown id, an image, media
    /// without a transcript yet) still gets the theme codes; every quote
    /// is dropped for want of text to match against.
    pub fn apply_themes(&mut self, themes: &[SuggestedTheme], document_id: &str) -> ThemePlan {
        let source_text = self
            .document(document_id)
            .and_then(|d| d.offset_source())
            .unwrap_or("")
            .to_string();

        let plan = plan_themes(themes, &source_text, document_id, self.codes.len());
        self.codes.extend(plan.codes.iter().cloned());
        self.quotes.extend(plan.quotes.iter().cloned());
        plan
    }
}
