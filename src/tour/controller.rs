//! Guided tour lifecycle: activation, step progression, countdown, skip and
//! completion persistence.
//!
//! The controller owns its timers on a [`TimerQueue`] and is driven by
//! [`TourController::advance_to`] with the host's virtual clock. Every armed
//! timer remembers the generation it was scheduled under and its own id; a
//! timer is only honoured while both still match, so anything that fires after
//! a restart, skip or unmount is a no-op.

use std::time::Duration;

use serde_json::json;

use crate::clock::{Scheduled, TimerId, TimerQueue};
use crate::config::TourTiming;
use crate::logging::{LogLevel, Logger, TARGET_STORE, TARGET_TOUR, json_kv, json_str};
use crate::store::{FlagStore, StoreError, TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE};

/// Index of the terminal "choose now" step.
pub const TERMINAL_STEP: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    /// Not yet initialized, or unmounted.
    Idle,
    /// Completion flag was set at startup; the tour never starts.
    Dormant,
    /// Activation delay running.
    Armed,
    Active,
    /// Finished or skipped during this session.
    Completed,
}

/// The render contract handed to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourSnapshot {
    pub active: bool,
    pub step: u8,
    pub time_left: u8,
}

impl TourSnapshot {
    /// Same snapshot with the step forced into `0..=TERMINAL_STEP`.
    pub fn clamped(self) -> Self {
        Self {
            step: self.step.min(TERMINAL_STEP),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourTimerKind {
    Activate,
    Countdown,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourTimer {
    pub kind: TourTimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// The terminal step's display period elapsed.
    Finished,
    Skipped,
    /// Escape key.
    Cancelled,
}

impl CompletionReason {
    fn as_str(self) -> &'static str {
        match self {
            CompletionReason::Finished => "finished",
            CompletionReason::Skipped => "skipped",
            CompletionReason::Cancelled => "cancelled",
        }
    }
}

/// Observable changes produced by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourTransition {
    Activated,
    CountdownTick { step: u8, time_left: u8 },
    StepAdvanced { from: u8, to: u8 },
    Completed {
        reason: CompletionReason,
        persisted: bool,
    },
}

pub struct TourController {
    timing: TourTiming,
    store: Box<dyn FlagStore>,
    logger: Option<Logger>,
    timers: TimerQueue<TourTimer>,
    phase: TourPhase,
    step: u8,
    time_left: u8,
    generation: u64,
    activation_timer: Option<TimerId>,
    countdown_timer: Option<TimerId>,
    advance_timer: Option<TimerId>,
    session_completed: bool,
    revision: u64,
}

impl TourController {
    pub fn new(timing: TourTiming, store: Box<dyn FlagStore>) -> Self {
        let time_left = timing.countdown();
        Self {
            timing,
            store,
            logger: None,
            timers: TimerQueue::new(),
            phase: TourPhase::Idle,
            step: 0,
            time_left,
            generation: 0,
            activation_timer: None,
            countdown_timer: None,
            advance_timer: None,
            session_completed: false,
            revision: 0,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == TourPhase::Active
    }

    pub fn snapshot(&self) -> TourSnapshot {
        TourSnapshot {
            active: self.is_active(),
            step: self.step,
            time_left: self.time_left,
        }
    }

    /// Bumped on every observable change; equal revisions render identically.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn timing(&self) -> &TourTiming {
        &self.timing
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> Vec<Scheduled<TourTimer>> {
        self.timers.pending().cloned().collect()
    }

    /// Read the completion flag and arm the activation delay if the tour has
    /// not run yet. Calling again while armed or active changes nothing.
    pub fn initialize(&mut self) -> TourPhase {
        if matches!(self.phase, TourPhase::Armed | TourPhase::Active) {
            return self.phase;
        }

        if self.session_completed || self.read_completed_flag() {
            self.phase = TourPhase::Dormant;
            self.log(LogLevel::Info, "tour_dormant", std::iter::empty());
            return self.phase;
        }

        self.generation += 1;
        let timer = TourTimer {
            kind: TourTimerKind::Activate,
            generation: self.generation,
        };
        self.activation_timer = Some(
            self.timers
                .schedule_after(self.timing.activation_delay(), timer),
        );
        self.phase = TourPhase::Armed;
        self.log(
            LogLevel::Info,
            "tour_armed",
            [json_kv(
                "activation_delay_ms",
                json!(self.timing.activation_delay_ms),
            )],
        );
        self.phase
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) -> Vec<TourTransition> {
        let mut transitions = Vec::new();
        while let Some(timer) = self.timers.pop_due(now) {
            if let Some(transition) = self.handle_timer(timer) {
                transitions.push(transition);
            }
        }
        self.timers.settle(now);
        transitions
    }

    /// Deliver a timer callback directly. Timers that were cancelled or
    /// superseded are ignored.
    pub fn fire(&mut self, timer: Scheduled<TourTimer>) -> Option<TourTransition> {
        self.timers.cancel(timer.id);
        self.handle_timer(timer)
    }

    pub fn skip(&mut self) -> Option<TourTransition> {
        if !self.is_active() {
            return None;
        }
        self.finish(CompletionReason::Skipped)
    }

    /// Escape-key path; identical to [`skip`](Self::skip) apart from the logged reason.
    pub fn cancel(&mut self) -> Option<TourTransition> {
        if !self.is_active() {
            return None;
        }
        self.finish(CompletionReason::Cancelled)
    }

    /// Persist completion and deactivate. Safe to call repeatedly: once the
    /// run has completed (or the tour was dormant) nothing further happens.
    pub fn complete(&mut self) -> Option<TourTransition> {
        self.finish(CompletionReason::Finished)
    }

    /// Release every timer without recording completion.
    pub fn unmount(&mut self) {
        let before = self.snapshot();
        self.release_timers();
        self.phase = TourPhase::Idle;
        self.reset_progress();
        self.bump_if_changed(before);
        self.log(LogLevel::Debug, "tour_unmounted", std::iter::empty());
    }

    fn handle_timer(&mut self, timer: Scheduled<TourTimer>) -> Option<TourTransition> {
        if timer.kind.generation != self.generation {
            return None;
        }
        let slot = match timer.kind.kind {
            TourTimerKind::Activate => &mut self.activation_timer,
            TourTimerKind::Countdown => &mut self.countdown_timer,
            TourTimerKind::Advance => &mut self.advance_timer,
        };
        if *slot != Some(timer.id) {
            return None;
        }
        *slot = None;

        match timer.kind.kind {
            TourTimerKind::Activate => self.activate(),
            TourTimerKind::Countdown => self.countdown_tick(),
            TourTimerKind::Advance => self.advance_step(),
        }
    }

    fn activate(&mut self) -> Option<TourTransition> {
        if self.phase != TourPhase::Armed {
            return None;
        }
        let before = self.snapshot();
        self.phase = TourPhase::Active;
        self.step = 0;
        self.time_left = self.timing.countdown();
        self.restart_step_timers();
        self.bump_if_changed(before);
        self.log(LogLevel::Info, "tour_started", [json_kv("step", json!(0))]);
        Some(TourTransition::Activated)
    }

    fn countdown_tick(&mut self) -> Option<TourTransition> {
        if !self.is_active() || self.step >= TERMINAL_STEP {
            return None;
        }
        let before = self.snapshot();
        self.time_left = if self.time_left <= 1 {
            self.timing.countdown()
        } else {
            self.time_left - 1
        };
        self.schedule_countdown();
        self.bump_if_changed(before);
        self.log(
            LogLevel::Trace,
            "tour_countdown",
            [
                json_kv("step", json!(self.step)),
                json_kv("time_left", json!(self.time_left)),
            ],
        );
        Some(TourTransition::CountdownTick {
            step: self.step,
            time_left: self.time_left,
        })
    }

    fn advance_step(&mut self) -> Option<TourTransition> {
        if !self.is_active() {
            return None;
        }
        if self.step >= TERMINAL_STEP {
            return self.finish(CompletionReason::Finished);
        }

        let before = self.snapshot();
        let from = self.step;
        self.step += 1;
        self.time_left = self.timing.countdown();
        self.restart_step_timers();
        self.bump_if_changed(before);
        self.log(
            LogLevel::Info,
            "tour_step_advanced",
            [json_kv("from", json!(from)), json_kv("to", json!(self.step))],
        );
        Some(TourTransition::StepAdvanced {
            from,
            to: self.step,
        })
    }

    fn finish(&mut self, reason: CompletionReason) -> Option<TourTransition> {
        if matches!(self.phase, TourPhase::Completed | TourPhase::Dormant) {
            return None;
        }

        let before = self.snapshot();
        let interrupted_step = self.step;
        self.release_timers();
        let persisted = self.persist_completion();
        if !persisted {
            self.session_completed = true;
        }
        self.phase = TourPhase::Completed;
        self.reset_progress();
        self.bump_if_changed(before);
        self.log(
            LogLevel::Info,
            "tour_completed",
            [
                json_kv("reason", json!(reason.as_str())),
                json_kv("step", json!(interrupted_step)),
                json_kv("persisted", json!(persisted)),
            ],
        );
        Some(TourTransition::Completed { reason, persisted })
    }

    /// Cancel both step timers and arm fresh ones for the current step.
    fn restart_step_timers(&mut self) {
        self.cancel_step_timers();
        self.generation += 1;
        let advance = TourTimer {
            kind: TourTimerKind::Advance,
            generation: self.generation,
        };
        self.advance_timer = Some(self.timers.schedule_after(self.timing.step_period(), advance));
        if self.step < TERMINAL_STEP {
            self.schedule_countdown();
        }
    }

    fn schedule_countdown(&mut self) {
        let tick = TourTimer {
            kind: TourTimerKind::Countdown,
            generation: self.generation,
        };
        self.countdown_timer = Some(self.timers.schedule_after(self.timing.tick_interval(), tick));
    }

    fn cancel_step_timers(&mut self) {
        if let Some(id) = self.countdown_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.advance_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn release_timers(&mut self) {
        self.cancel_step_timers();
        if let Some(id) = self.activation_timer.take() {
            self.timers.cancel(id);
        }
        self.generation += 1;
    }

    fn reset_progress(&mut self) {
        self.step = 0;
        self.time_left = self.timing.countdown();
    }

    fn read_completed_flag(&self) -> bool {
        match self.store.get(TOUR_COMPLETED_KEY) {
            Ok(value) => value.as_deref() == Some(TOUR_COMPLETED_VALUE),
            Err(err) => {
                self.log_store_failure("flag_read_failed", &err);
                false
            }
        }
    }

    fn persist_completion(&mut self) -> bool {
        match self.store.set(TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE) {
            Ok(()) => true,
            Err(err) => {
                self.log_store_failure("flag_write_failed", &err);
                false
            }
        }
    }

    fn bump_if_changed(&mut self, before: TourSnapshot) {
        if self.snapshot() != before {
            self.revision += 1;
        }
    }

    fn log_store_failure(&self, message: &str, err: &StoreError) {
        if let Some(logger) = &self.logger {
            logger.emit(
                LogLevel::Warn,
                TARGET_STORE,
                message,
                [
                    json_str("key", TOUR_COMPLETED_KEY),
                    json_str("error", err.to_string()),
                ],
            );
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = &self.logger {
            logger.emit(level, TARGET_TOUR, message, fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::store::{MemoryStore, StoreError, StoreResult};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn fresh() -> (TourController, MemoryStore) {
        let store = MemoryStore::new();
        let controller = TourController::new(TourTiming::default(), Box::new(store.clone()));
        (controller, store)
    }

    fn snapshot(active: bool, step: u8, time_left: u8) -> TourSnapshot {
        TourSnapshot {
            active,
            step,
            time_left,
        }
    }

    /// Store whose every operation fails, as when storage is disabled.
    struct UnavailableStore;

    impl FlagStore for UnavailableStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }
    }

    #[test]
    fn activates_after_delay_on_fresh_scope() {
        let (mut tour, _) = fresh();
        assert_eq!(tour.initialize(), TourPhase::Armed);
        assert!(tour.advance_to(ms(999)).is_empty());
        assert!(!tour.snapshot().active);

        let transitions = tour.advance_to(ms(1000));
        assert_eq!(transitions, vec![TourTransition::Activated]);
        assert_eq!(tour.snapshot(), snapshot(true, 0, 4));
    }

    #[test]
    fn completed_scope_never_activates() {
        let store = MemoryStore::with_entry(TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE);
        let mut tour = TourController::new(TourTiming::default(), Box::new(store.clone()));
        assert_eq!(tour.initialize(), TourPhase::Dormant);
        for second in 1..=60 {
            tour.advance_to(ms(second * 1000));
            assert!(!tour.snapshot().active);
        }
        assert!(tour.pending_timers().is_empty());
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 0);
    }

    #[test]
    fn other_flag_values_count_as_not_completed() {
        let store = MemoryStore::with_entry(TOUR_COMPLETED_KEY, "yes");
        let mut tour = TourController::new(TourTiming::default(), Box::new(store));
        assert_eq!(tour.initialize(), TourPhase::Armed);
    }

    #[test]
    fn countdown_cycles_before_every_step_advance() {
        let (mut tour, _) = fresh();
        tour.initialize();
        tour.advance_to(ms(1000));

        let mut now = 1000;
        for step in 0..TERMINAL_STEP {
            let mut seen = vec![tour.snapshot().time_left];
            for _ in 0..3 {
                now += 1000;
                tour.advance_to(ms(now));
                assert_eq!(tour.snapshot().step, step);
                seen.push(tour.snapshot().time_left);
            }
            assert_eq!(seen, vec![4, 3, 2, 1]);

            now += 1000;
            tour.advance_to(ms(now));
            assert_eq!(tour.snapshot(), snapshot(true, step + 1, 4));
        }
    }

    #[test]
    fn terminal_step_has_no_countdown_and_then_completes() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(17_000));
        assert_eq!(tour.snapshot(), snapshot(true, TERMINAL_STEP, 4));

        let kinds: Vec<_> = tour
            .pending_timers()
            .into_iter()
            .map(|timer| timer.kind.kind)
            .collect();
        assert_eq!(kinds, vec![TourTimerKind::Advance]);

        tour.advance_to(ms(20_999));
        assert!(tour.snapshot().active);
        let transitions = tour.advance_to(ms(21_000));
        assert_eq!(
            transitions,
            vec![TourTransition::Completed {
                reason: CompletionReason::Finished,
                persisted: true,
            }]
        );
        assert_eq!(tour.snapshot(), snapshot(false, 0, 4));
        assert_eq!(store.value(TOUR_COMPLETED_KEY).as_deref(), Some("true"));
        assert_eq!(tour.phase(), TourPhase::Completed);
    }

    #[test]
    fn full_run_in_one_advance_reports_every_step() {
        let (mut tour, store) = fresh();
        tour.initialize();
        let transitions = tour.advance_to(ms(60_000));
        let steps: Vec<_> = transitions
            .iter()
            .filter_map(|transition| match transition {
                TourTransition::StepAdvanced { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert!(matches!(
            transitions.last(),
            Some(TourTransition::Completed {
                reason: CompletionReason::Finished,
                ..
            })
        ));
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 1);
    }

    #[test]
    fn skip_at_any_point_resets_and_persists_once() {
        for step in 0..=TERMINAL_STEP {
            for elapsed_ticks in 0..4u64 {
                if step == TERMINAL_STEP && elapsed_ticks > 0 {
                    continue;
                }
                let (mut tour, store) = fresh();
                tour.initialize();
                let at = 1000 + u64::from(step) * 4000 + elapsed_ticks * 1000;
                tour.advance_to(ms(at));
                let before = tour.snapshot();
                assert!(before.active);
                assert_eq!(before.step, step);

                let transition = tour.skip();
                assert_eq!(
                    transition,
                    Some(TourTransition::Completed {
                        reason: CompletionReason::Skipped,
                        persisted: true,
                    })
                );
                assert_eq!(tour.snapshot(), snapshot(false, 0, 4));
                assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 1);
                assert!(tour.pending_timers().is_empty());
            }
        }
    }

    #[test]
    fn repeated_completion_is_idempotent() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(6000));

        assert!(tour.complete().is_some());
        let state = tour.snapshot();
        let revision = tour.revision();
        assert_eq!(tour.complete(), None);
        assert_eq!(tour.skip(), None);
        assert_eq!(tour.cancel(), None);
        assert_eq!(tour.snapshot(), state);
        assert_eq!(tour.revision(), revision);
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 1);
        assert_eq!(store.value(TOUR_COMPLETED_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn escape_at_step_two_cancels_immediately() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(11_000));
        assert_eq!(tour.snapshot(), snapshot(true, 2, 2));

        let transition = tour.cancel();
        assert_eq!(
            transition,
            Some(TourTransition::Completed {
                reason: CompletionReason::Cancelled,
                persisted: true,
            })
        );
        assert_eq!(tour.snapshot(), snapshot(false, 0, 4));
        assert_eq!(store.value(TOUR_COMPLETED_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn skip_and_cancel_are_ignored_while_inactive() {
        let (mut tour, store) = fresh();
        assert_eq!(tour.skip(), None);
        tour.initialize();
        assert_eq!(tour.cancel(), None);
        assert_eq!(tour.phase(), TourPhase::Armed);
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 0);
    }

    #[test]
    fn stale_callbacks_after_skip_are_unobservable() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(6000));
        let stale = tour.pending_timers();
        assert_eq!(stale.len(), 2);

        tour.skip();
        let state = tour.snapshot();
        let revision = tour.revision();
        for timer in stale {
            assert_eq!(tour.fire(timer), None);
        }
        assert_eq!(tour.snapshot(), state);
        assert_eq!(tour.revision(), revision);
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 1);
        assert!(tour.advance_to(ms(60_000)).is_empty());
    }

    #[test]
    fn superseded_step_timers_are_ignored() {
        let (mut tour, _) = fresh();
        tour.initialize();
        tour.advance_to(ms(3000));
        let previous_step = tour.pending_timers();

        tour.advance_to(ms(5000));
        assert_eq!(tour.snapshot(), snapshot(true, 1, 4));
        for timer in previous_step {
            assert_eq!(tour.fire(timer), None);
        }
        assert_eq!(tour.snapshot(), snapshot(true, 1, 4));
    }

    #[test]
    fn unmount_releases_timers_without_persisting() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(2000));
        tour.unmount();
        assert_eq!(tour.phase(), TourPhase::Idle);
        assert!(tour.pending_timers().is_empty());
        assert_eq!(store.write_count(TOUR_COMPLETED_KEY), 0);

        assert_eq!(tour.initialize(), TourPhase::Armed);
    }

    #[test]
    fn cleared_flag_starts_a_fresh_scope() {
        let store = MemoryStore::with_entry(TOUR_COMPLETED_KEY, TOUR_COMPLETED_VALUE);
        let mut tour = TourController::new(TourTiming::default(), Box::new(store.clone()));
        assert_eq!(tour.initialize(), TourPhase::Dormant);

        let mut handle = store.clone();
        handle.remove(TOUR_COMPLETED_KEY).unwrap();
        assert_eq!(tour.initialize(), TourPhase::Armed);
    }

    #[test]
    fn cleared_flag_after_completed_run_rearms() {
        let (mut tour, store) = fresh();
        tour.initialize();
        tour.advance_to(ms(1000));
        assert!(tour.skip().is_some());
        assert_eq!(store.value(TOUR_COMPLETED_KEY).as_deref(), Some(TOUR_COMPLETED_VALUE));
        assert_eq!(tour.initialize(), TourPhase::Dormant);

        let mut handle = store.clone();
        handle.remove(TOUR_COMPLETED_KEY).unwrap();
        assert_eq!(tour.initialize(), TourPhase::Armed);
        tour.advance_to(ms(2000));
        assert_eq!(tour.snapshot(), snapshot(true, 0, 4));
    }

    #[test]
    fn unavailable_storage_degrades_to_session_memory() {
        let sink = MemorySink::new();
        let mut tour = TourController::new(TourTiming::default(), Box::new(UnavailableStore))
            .with_logger(Logger::new(sink.clone()));

        assert_eq!(tour.initialize(), TourPhase::Armed);
        tour.advance_to(ms(1000));
        assert!(tour.snapshot().active);

        let transition = tour.skip();
        assert_eq!(
            transition,
            Some(TourTransition::Completed {
                reason: CompletionReason::Skipped,
                persisted: false,
            })
        );
        assert!(!tour.snapshot().active);
        assert_eq!(tour.initialize(), TourPhase::Dormant);

        let messages = sink.messages();
        assert!(messages.contains(&"flag_read_failed".to_string()));
        assert!(messages.contains(&"flag_write_failed".to_string()));
    }

    #[test]
    fn revision_tracks_observable_changes_only() {
        let (mut tour, _) = fresh();
        tour.initialize();
        assert_eq!(tour.revision(), 0);
        tour.advance_to(ms(1000));
        assert_eq!(tour.revision(), 1);
        tour.advance_to(ms(1500));
        assert_eq!(tour.revision(), 1);
        tour.advance_to(ms(2000));
        assert_eq!(tour.revision(), 2);
    }

    #[test]
    fn custom_timing_is_honoured() {
        let timing = TourTiming {
            activation_delay_ms: 250,
            step_period_ms: 1500,
            tick_interval_ms: 500,
            countdown: 3,
        };
        let mut tour = TourController::new(timing, Box::new(MemoryStore::new()));
        tour.initialize();
        tour.advance_to(ms(250));
        assert_eq!(tour.snapshot(), snapshot(true, 0, 3));
        tour.advance_to(ms(1250));
        assert_eq!(tour.snapshot(), snapshot(true, 0, 1));
        tour.advance_to(ms(1750));
        assert_eq!(tour.snapshot(), snapshot(true, 1, 3));
    }
}
