use std::collections::HashMap;

use crate::runtime::ZoneLayout;
use crate::{Rect, Result, Size, ZoneId};

pub const ZONE_HEADER: &str = "hub:page.header";
pub const ZONE_TAGLINE: &str = "hub:page.tagline";
pub const ZONE_LINKS: &str = "hub:page.links";
pub const ZONE_TOUR: &str = "hub:page.tour";
pub const ZONE_TOASTS: &str = "hub:page.toasts";
pub const ZONE_COUPON: &str = "hub:page.coupon";
pub const ZONE_INSTALL: &str = "hub:page.install";
pub const ZONE_FOOTER: &str = "hub:page.footer";

/// Widest the content column grows on large terminals.
pub const MAX_COLUMN_WIDTH: u16 = 48;
/// Each link takes its label row plus a spacer row.
pub const LINK_ROW_HEIGHT: u16 = 2;

pub const HEADER_HEIGHT: u16 = 2;
pub const TAGLINE_HEIGHT: u16 = 2;
pub const TOUR_HEIGHT: u16 = 6;
pub const COUPON_HEIGHT: u16 = 2;
pub const INSTALL_HEIGHT: u16 = 2;
pub const FOOTER_HEIGHT: u16 = 1;

/// Stacks the page zones top to bottom in a centered column. Zones that fall
/// below the terminal are clipped to zero height and never drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    link_count: u16,
    toast_rows: u16,
}

impl PageLayout {
    pub fn new(link_count: usize, toast_rows: usize) -> Self {
        Self {
            link_count: u16::try_from(link_count).unwrap_or(u16::MAX),
            toast_rows: u16::try_from(toast_rows).unwrap_or(u16::MAX),
        }
    }

    pub fn column_width(size: Size) -> u16 {
        size.width.min(MAX_COLUMN_WIDTH)
    }

    fn stack(&self) -> [(&'static str, u16); 8] {
        [
            (ZONE_HEADER, HEADER_HEIGHT),
            (ZONE_TAGLINE, TAGLINE_HEIGHT),
            (ZONE_LINKS, self.link_count.saturating_mul(LINK_ROW_HEIGHT)),
            (ZONE_TOUR, TOUR_HEIGHT),
            (ZONE_TOASTS, self.toast_rows),
            (ZONE_COUPON, COUPON_HEIGHT),
            (ZONE_INSTALL, INSTALL_HEIGHT),
            (ZONE_FOOTER, FOOTER_HEIGHT),
        ]
    }

    pub fn solve_rects(&self, size: Size) -> HashMap<ZoneId, Rect> {
        let width = Self::column_width(size);
        let x = (size.width - width) / 2;
        let mut y = 1u16.min(size.height);
        let mut rects = HashMap::new();

        for (zone, wanted) in self.stack() {
            let height = wanted.min(size.height.saturating_sub(y));
            rects.insert(zone.to_string(), Rect::new(x, y, width, height));
            y = y.saturating_add(height);
        }
        rects
    }
}

impl ZoneLayout for PageLayout {
    fn solve(&self, size: Size) -> Result<HashMap<ZoneId, Rect>> {
        Ok(self.solve_rects(size))
    }
}

/// Which link occupies the terminal cell `(col, row)` inside the links zone.
pub fn link_index_at(links: &Rect, col: u16, row: u16) -> Option<usize> {
    if !links.contains(col, row) {
        return None;
    }
    Some(((row - links.y) / LINK_ROW_HEIGHT) as usize)
}
