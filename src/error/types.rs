use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Unified result type for the link hub crate.
pub type Result<T> = std::result::Result<T, HubError>;

/// Errors surfaced by the hub runtime and its collaborators.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("zone `{0}` not found")]
    ZoneNotFound(String),
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("flag store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
