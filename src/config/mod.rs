//! Hub configuration loaded from an optional JSON file.

mod core;

pub use self::core::{
    ConfigError, CouponConfig, HubConfig, InstallPromptConfig, LinkOverride, PageCopy,
    ToastConfig, TourTiming,
};
