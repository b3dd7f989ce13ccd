//! Cosmetic page widgets. Each runs its own timers and shares nothing with
//! the tour controller.

pub mod coupon;
pub mod install;
pub mod toasts;

pub use coupon::CouponBadge;
pub use install::{
    FixedInstallCapability, InstallCapability, InstallOutcome, InstallPrompt, InstallPromptState,
    UnsupportedInstall,
};
pub use toasts::{OrderToast, OrderToastFeed, ToastUpdate};
