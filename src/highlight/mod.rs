// Highlight rendering module
// Span resolution into runs, selection mapping, and color contrast

pub mod contrast;
pub mod locate;
pub mod resolver;
pub mod selection;

pub use contrast::{text_color_for, TextColor};
pub use locate::locate;
pub use resolver::{resolve_runs, Run};
pub use selection::{map_selection, SelectionContext};
