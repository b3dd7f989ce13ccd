//! Simulated "someone just ordered" notifications.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::clock::TimerQueue;
use crate::config::ToastConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderToast {
    pub id: u64,
    pub name: String,
    pub dish: String,
    pub shown_at: Duration,
}

impl OrderToast {
    pub fn message(&self) -> String {
        format!("{} acabou de pedir {}", self.name, self.dish)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastTimer {
    Spawn,
    Expire(u64),
}

/// What changed during one [`OrderToastFeed::advance_to`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToastUpdate {
    pub shown: usize,
    pub expired: usize,
}

impl ToastUpdate {
    pub fn changed(&self) -> bool {
        self.shown > 0 || self.expired > 0
    }
}

pub struct OrderToastFeed {
    config: ToastConfig,
    rng: SmallRng,
    timers: TimerQueue<ToastTimer>,
    visible: VecDeque<OrderToast>,
    next_id: u64,
    running: bool,
}

impl OrderToastFeed {
    pub fn new(config: ToastConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            timers: TimerQueue::new(),
            visible: VecDeque::new(),
            next_id: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.running || !self.config.enabled {
            return;
        }
        if self.config.names.is_empty() || self.config.dishes.is_empty() {
            return;
        }
        self.running = true;
        self.timers.schedule_after(
            Duration::from_millis(self.config.first_delay_ms),
            ToastTimer::Spawn,
        );
    }

    /// Cancel every pending timer and clear visible toasts.
    pub fn stop(&mut self) {
        self.running = false;
        self.timers.clear();
        self.visible.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn visible(&self) -> impl Iterator<Item = &OrderToast> {
        self.visible.iter()
    }

    pub fn advance_to(&mut self, now: Duration) -> ToastUpdate {
        let mut update = ToastUpdate::default();
        while let Some(timer) = self.timers.pop_due(now) {
            match timer.kind {
                ToastTimer::Spawn => {
                    if self.running {
                        self.spawn(&mut update);
                    }
                }
                ToastTimer::Expire(id) => {
                    let before = self.visible.len();
                    self.visible.retain(|toast| toast.id != id);
                    update.expired += before - self.visible.len();
                }
            }
        }
        self.timers.settle(now);
        update
    }

    fn spawn(&mut self, update: &mut ToastUpdate) {
        let name = self.config.names[self.rng.random_range(0..self.config.names.len())].clone();
        let dish = self.config.dishes[self.rng.random_range(0..self.config.dishes.len())].clone();
        let id = self.next_id;
        self.next_id += 1;

        if self.config.max_visible > 0 {
            while self.visible.len() >= self.config.max_visible {
                self.visible.pop_front();
                update.expired += 1;
            }
            self.visible.push_back(OrderToast {
                id,
                name,
                dish,
                shown_at: self.timers.now(),
            });
            update.shown += 1;
            self.timers.schedule_after(
                Duration::from_millis(self.config.display_ms),
                ToastTimer::Expire(id),
            );
        }

        self.timers.schedule_after(
            Duration::from_millis(self.config.interval_ms.max(1)),
            ToastTimer::Spawn,
        );
    }
}
