//! Cosmetic coupon badge: appears after a delay, can be expanded or dismissed.

use std::time::Duration;

use crate::clock::TimerQueue;
use crate::config::CouponConfig;

pub struct CouponBadge {
    config: CouponConfig,
    timers: TimerQueue<()>,
    visible: bool,
    expanded: bool,
    dismissed: bool,
}

impl CouponBadge {
    pub fn new(config: CouponConfig) -> Self {
        Self {
            config,
            timers: TimerQueue::new(),
            visible: false,
            expanded: false,
            dismissed: false,
        }
    }

    pub fn start(&mut self) {
        if !self.config.enabled || self.dismissed || self.visible || !self.timers.is_empty() {
            return;
        }
        self.timers
            .schedule_after(Duration::from_millis(self.config.delay_ms), ());
    }

    pub fn stop(&mut self) {
        self.timers.clear();
    }

    /// Returns `true` when the badge became visible.
    pub fn advance_to(&mut self, now: Duration) -> bool {
        let mut revealed = false;
        while self.timers.pop_due(now).is_some() {
            if !self.dismissed && !self.visible {
                self.visible = true;
                revealed = true;
            }
        }
        self.timers.settle(now);
        revealed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.expanded = !self.expanded;
        true
    }

    /// Hide for the rest of the session.
    pub fn dismiss(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.expanded = false;
        self.dismissed = true;
        self.timers.clear();
        true
    }

    pub fn lines(&self) -> Vec<String> {
        if !self.visible {
            return Vec::new();
        }
        if self.expanded {
            vec![
                format!("🎟  {}", self.config.label),
                format!("Use o cupom {} · [c] fechar · [x] dispensar", self.config.code),
            ]
        } else {
            vec![format!("🎟  Cupom {} · [c] ver", self.config.code)]
        }
    }
}
