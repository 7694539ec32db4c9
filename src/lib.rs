// Coda-Local - qualitative coding core with an AI collaborator
//
// The parts with design weight live here:
// - the in-memory annotation model (documents, codes, quotes, comments)
// - deterministic span resolution for highlight rendering
// - the provider boundary to the generative-AI backend (code suggestion,
//   theme detection, media transcription, corpus Q&A)
//
// Presentation, file pickers, and storage backends are other layers'
// problems; projects persist through JSON snapshots of the store.

// Performance logging macros - exported for use by other modules
#[macro_use]
pub mod macros;

// Core modules
pub mod ai_engine;
pub mod highlight;
pub mod session;
pub mod state;
pub mod store;

pub use ai_engine::{AiEngine, AiError, AiProvider};
pub use highlight::{map_selection, resolve_runs, text_color_for, Run, SelectionContext, TextColor};
pub use session::{SuggestionOutcome, Workspace};
pub use state::AppState;
pub use store::{AnnotationStore, ProjectSnapshot};

/// Initialize env_logger to output to stderr (reads RUST_LOG env var)
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
