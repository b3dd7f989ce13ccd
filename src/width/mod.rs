//! Terminal display width helpers.

mod utils;

pub use utils::{center_line, display_width, truncate_display, wrap_words};
