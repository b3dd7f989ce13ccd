//! The page's fixed outbound links and the hover state over them.

mod core;

pub use self::core::{HoverState, LinkKind, LinkOpener, LinkTable, LoggingOpener, TargetLink};
