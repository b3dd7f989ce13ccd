//! Terminal link hub for the Fetuccine Eldorado restaurant.
//!
//! One page of outbound links with a first-visit guided tour, simulated order
//! toasts, a coupon badge and an install prompt. Everything runs on a plugin
//! runtime that advances a virtual clock on each tick and redraws only the
//! zones whose content changed.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod links;
pub mod logging;
pub mod metrics;
pub mod page;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod store;
pub mod tour;
pub mod widgets;
pub mod width;

pub use app::HubBuilder;
pub use clock::{Scheduled, TimerId, TimerQueue};
pub use config::{ConfigError, HubConfig, TourTiming};
pub use error::{HubError, Result};
pub use geometry::{Rect, Size};
pub use links::{HoverState, LinkKind, LinkOpener, LinkTable, LoggingOpener, TargetLink};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{HubMetrics, MetricSnapshot};
pub use page::{LinkHubPage, PageLayout};
pub use registry::{ZoneContent, ZoneId, ZoneRegistry};
pub use render::{AnsiRenderer, RendererSettings};
pub use runtime::diagnostics::{InputSelection, LifecycleLoggerPlugin};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{
    EventFlow, HubPlugin, HubRuntime, RuntimeConfig, RuntimeContext, RuntimeEvent, ZoneLayout,
};
pub use store::{FlagStore, JsonFileStore, MemoryStore, StoreError};
pub use tour::{
    TourController, TourPhase, TourPresenter, TourSnapshot, TourTransition, TourView,
};
pub use widgets::{
    CouponBadge, FixedInstallCapability, InstallCapability, InstallOutcome, InstallPrompt,
    OrderToastFeed, UnsupportedInstall,
};
pub use width::display_width;
