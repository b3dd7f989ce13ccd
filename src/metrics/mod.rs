use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the runtime and the page while the hub runs.
#[derive(Debug, Default, Clone)]
pub struct HubMetrics {
    events: u64,
    renders: u64,
    dirty_zones: u64,
    tour_transitions: u64,
    toasts_shown: u64,
    links_opened: u64,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_render(&mut self, dirty_count: usize) {
        self.renders = self.renders.saturating_add(1);
        self.dirty_zones = self.dirty_zones.saturating_add(dirty_count as u64);
    }

    pub fn record_tour_transition(&mut self) {
        self.tour_transitions = self.tour_transitions.saturating_add(1);
    }

    pub fn record_toasts(&mut self, count: usize) {
        self.toasts_shown = self.toasts_shown.saturating_add(count as u64);
    }

    pub fn record_link_open(&mut self) {
        self.links_opened = self.links_opened.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            renders: self.renders,
            dirty_zones: self.dirty_zones,
            tour_transitions: self.tour_transitions,
            toasts_shown: self.toasts_shown,
            links_opened: self.links_opened,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub renders: u64,
    pub dirty_zones: u64,
    pub tour_transitions: u64,
    pub toasts_shown: u64,
    pub links_opened: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("dirty_zones".to_string(), json!(self.dirty_zones));
        map.insert("tour_transitions".to_string(), json!(self.tour_transitions));
        map.insert("toasts_shown".to_string(), json!(self.toasts_shown));
        map.insert("links_opened".to_string(), json!(self.links_opened));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "hub_metrics", self.as_fields())
    }
}
