//! Zone bookkeeping with content hashing so unchanged zones are never redrawn.

mod core;

pub use self::core::{ZoneContent, ZoneId, ZoneRegistry, ZoneState};
