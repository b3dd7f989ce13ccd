//! Installable-app prompt surfaced after a delay when the platform allows it.

use std::time::Duration;

use crate::clock::TimerQueue;
use crate::config::InstallPromptConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// The platform's install capability. Opaque apart from its yes/no answer.
pub trait InstallCapability: Send {
    fn is_installable(&self) -> bool;
    fn prompt(&mut self) -> InstallOutcome;
}

/// Platform without install support; the prompt never appears.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedInstall;

impl InstallCapability for UnsupportedInstall {
    fn is_installable(&self) -> bool {
        false
    }

    fn prompt(&mut self) -> InstallOutcome {
        InstallOutcome::Dismissed
    }
}

/// Capability whose answer is fixed up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedInstallCapability {
    pub outcome: InstallOutcome,
    pub prompts: usize,
}

impl FixedInstallCapability {
    pub fn new(outcome: InstallOutcome) -> Self {
        Self {
            outcome,
            prompts: 0,
        }
    }
}

impl InstallCapability for FixedInstallCapability {
    fn is_installable(&self) -> bool {
        true
    }

    fn prompt(&mut self) -> InstallOutcome {
        self.prompts += 1;
        self.outcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPromptState {
    Hidden,
    Pending,
    Shown,
    Resolved(InstallOutcome),
}

pub struct InstallPrompt {
    config: InstallPromptConfig,
    capability: Box<dyn InstallCapability>,
    timers: TimerQueue<()>,
    state: InstallPromptState,
}

impl InstallPrompt {
    pub fn new(config: InstallPromptConfig, capability: Box<dyn InstallCapability>) -> Self {
        Self {
            config,
            capability,
            timers: TimerQueue::new(),
            state: InstallPromptState::Hidden,
        }
    }

    pub fn state(&self) -> InstallPromptState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == InstallPromptState::Shown
    }

    pub fn start(&mut self) {
        if self.state != InstallPromptState::Hidden || !self.config.enabled {
            return;
        }
        if !self.capability.is_installable() {
            return;
        }
        self.timers
            .schedule_after(Duration::from_millis(self.config.delay_ms), ());
        self.state = InstallPromptState::Pending;
    }

    pub fn stop(&mut self) {
        self.timers.clear();
        if matches!(
            self.state,
            InstallPromptState::Pending | InstallPromptState::Shown
        ) {
            self.state = InstallPromptState::Hidden;
        }
    }

    /// Returns `true` when the prompt surfaced.
    pub fn advance_to(&mut self, now: Duration) -> bool {
        let mut surfaced = false;
        while self.timers.pop_due(now).is_some() {
            if self.state == InstallPromptState::Pending {
                self.state = InstallPromptState::Shown;
                surfaced = true;
            }
        }
        self.timers.settle(now);
        surfaced
    }

    /// Hand over to the platform prompt and hide with its answer.
    pub fn accept(&mut self) -> Option<InstallOutcome> {
        if !self.is_shown() {
            return None;
        }
        let outcome = self.capability.prompt();
        self.state = InstallPromptState::Resolved(outcome);
        Some(outcome)
    }

    pub fn dismiss(&mut self) -> bool {
        if !self.is_shown() {
            return false;
        }
        self.state = InstallPromptState::Resolved(InstallOutcome::Dismissed);
        true
    }

    pub fn lines(&self) -> Vec<String> {
        if !self.is_shown() {
            return Vec::new();
        }
        vec![
            format!("📲 {}", self.config.message),
            "[i] instalar · [n] agora não".to_string(),
        ]
    }
}
