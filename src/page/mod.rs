//! The link hub page: zone layout plus the plugin that draws into it.

mod core;
pub mod layout;

pub use self::core::{LinkHubPage, TOUR_SKIP_ROW};
pub use layout::{PageLayout, link_index_at};
