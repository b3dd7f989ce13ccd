//! Virtual timeline used by every timer-driven component of the hub.
//!
//! Components own a [`TimerQueue`] and are advanced explicitly with the
//! runtime's virtual `now`, so tests drive time by hand instead of sleeping.

mod core;

pub use self::core::{Scheduled, TimerId, TimerQueue};
