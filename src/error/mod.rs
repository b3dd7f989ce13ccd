//! Error types shared across the hub.

mod types;

pub use types::{HubError, Result};
