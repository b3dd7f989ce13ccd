//! ANSI renderer for dirty zones.

mod core;

pub use self::core::{AnsiRenderer, RendererSettings};
