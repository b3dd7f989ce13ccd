//! Key-value persistence for the tour completion flag.

mod core;

pub use self::core::{
    FlagStore, JsonFileStore, MemoryStore, StoreError, StoreResult, TOUR_COMPLETED_KEY,
    TOUR_COMPLETED_VALUE,
};
