//! First-visit guided tour over the page's links.
//!
//! [`TourController`] owns the step/timer state machine; [`TourPresenter`]
//! turns its [`TourSnapshot`] into a [`TourView`] without holding any state.

pub mod controller;
pub mod presenter;

pub use controller::{
    CompletionReason, TERMINAL_STEP, TourController, TourPhase, TourSnapshot, TourTimer,
    TourTimerKind, TourTransition,
};
pub use presenter::{
    Countdown, HighlightMap, SKIP_LABEL, TOUR_STEPS, TourPresenter, TourStepCopy, TourView,
    link_interactive,
};
