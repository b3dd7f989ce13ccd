use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use serde_json::json;

use crate::logging::{LogLevel, Logger, TARGET_RUNTIME, json_kv};
use crate::{AnsiRenderer, HubMetrics, Rect, Result, Size, ZoneId, ZoneRegistry};

pub mod diagnostics;
pub mod driver;

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events; each tick advances the virtual clock.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<HubMetrics>>>,
    /// Virtual time between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(30),
            metrics_target: "hub::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(HubMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<HubMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Solves zone rectangles for a terminal size.
pub trait ZoneLayout: Send {
    fn solve(&self, size: Size) -> Result<HashMap<ZoneId, Rect>>;
}

/// High-level events delivered to plugins.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize(Size),
}

/// Control the propagation of an event across plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// Context passed to plugins so they can interact with the runtime safely.
pub struct RuntimeContext<'a> {
    rects: &'a HashMap<String, Rect>,
    now: Duration,
    metrics: Option<&'a Arc<Mutex<HubMetrics>>>,
    zone_updates: Vec<(String, String)>,
    redraw_requested: bool,
    exit_requested: bool,
}

impl<'a> RuntimeContext<'a> {
    fn new(
        rects: &'a HashMap<String, Rect>,
        now: Duration,
        metrics: Option<&'a Arc<Mutex<HubMetrics>>>,
    ) -> Self {
        Self {
            rects,
            now,
            metrics,
            zone_updates: Vec::new(),
            redraw_requested: false,
            exit_requested: false,
        }
    }

    /// Virtual time since the runtime started.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue new content for a zone. The update is applied after the plugin completes.
    pub fn set_zone(&mut self, zone_id: impl Into<String>, content: impl Into<String>) {
        self.zone_updates.push((zone_id.into(), content.into()));
        self.redraw_requested = true;
    }

    pub fn request_render(&mut self) {
        self.redraw_requested = true;
    }

    /// Signal to the runtime that execution should terminate at the end of the frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Fetch the solved rectangle for a zone if available.
    pub fn rect(&self, zone_id: &str) -> Option<&Rect> {
        self.rects.get(zone_id)
    }

    /// Zone whose rectangle holds the cell at `(col, row)`.
    pub fn zone_at(&self, col: u16, row: u16) -> Option<&str> {
        self.rects
            .iter()
            .find(|(_, rect)| rect.contains(col, row))
            .map(|(zone, _)| zone.as_str())
    }

    pub fn record_metric(&self, record: impl FnOnce(&mut HubMetrics)) {
        if let Some(metrics) = self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn into_outcome(self) -> ContextOutcome {
        ContextOutcome {
            zone_updates: self.zone_updates,
            redraw_requested: self.redraw_requested,
            exit_requested: self.exit_requested,
        }
    }
}

struct ContextOutcome {
    zone_updates: Vec<(String, String)>,
    redraw_requested: bool,
    exit_requested: bool,
}

/// Behaviour injection point for the runtime.
pub trait HubPlugin: Send {
    fn name(&self) -> &str {
        "hub_plugin"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_event(
        &mut self,
        _ctx: &mut RuntimeContext<'_>,
        _event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn before_render(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once when the runtime stops; release timers here.
    fn shutdown(&mut self) {}
}

pub struct HubRuntime {
    layout: Box<dyn ZoneLayout>,
    rects: HashMap<String, Rect>,
    registry: ZoneRegistry,
    renderer: AnsiRenderer,
    plugins: Vec<Box<dyn HubPlugin>>,
    config: RuntimeConfig,
    now: Duration,
    should_exit: bool,
    redraw_requested: bool,
    clear_requested: bool,
    last_metrics_emit: Duration,
}

impl HubRuntime {
    pub fn new(
        layout: Box<dyn ZoneLayout>,
        renderer: AnsiRenderer,
        initial_size: Size,
    ) -> Result<Self> {
        Self::with_config(layout, renderer, initial_size, RuntimeConfig::default())
    }

    pub fn with_config(
        layout: Box<dyn ZoneLayout>,
        renderer: AnsiRenderer,
        initial_size: Size,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let mut registry = ZoneRegistry::new();
        let rects = layout.solve(initial_size)?;
        registry.sync_layout(&rects);

        Ok(Self {
            layout,
            rects,
            registry,
            renderer,
            plugins: Vec::new(),
            config,
            now: Duration::ZERO,
            should_exit: false,
            redraw_requested: true,
            clear_requested: true,
            last_metrics_emit: Duration::ZERO,
        })
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn register_plugin<P>(&mut self, plugin: P)
    where
        P: HubPlugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
    }

    /// Virtual time accumulated from dispatched ticks.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Last content written to a zone.
    pub fn zone_text(&self, zone_id: &str) -> Option<&str> {
        self.registry.content_of(zone_id)
    }

    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.handle_resize(size)
    }

    /// Drive the terminal loop until a plugin requests exit. Plugins are shut
    /// down on every exit path, including errors.
    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        let result = self.run_loop(stdout);
        self.finish(&result);
        result
    }

    fn run_loop(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                let crossterm_event = event::read()?;
                if let Some(runtime_event) = self.map_event(crossterm_event)? {
                    self.dispatch_event(runtime_event)?;
                    self.render_if_needed(stdout)?;
                    if self.should_exit {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }
        }
        Ok(())
    }

    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        let result = self.run_script(stdout, events);
        self.finish(&result);
        result
    }

    fn run_script<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            if let RuntimeEvent::Resize(size) = &event {
                self.handle_resize(*size)?;
            }
            self.dispatch_event(event)?;
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) -> Result<()> {
        if let RuntimeEvent::Tick { elapsed } = &event {
            self.now = self.now.saturating_add(*elapsed);
        }

        let mut consumed = false;
        for idx in 0..self.plugins.len() {
            let (flow, outcome) = {
                let plugin = &mut self.plugins[idx];
                let mut ctx =
                    RuntimeContext::new(&self.rects, self.now, self.config.metrics.as_ref());
                let flow = plugin.on_event(&mut ctx, &event)?;
                (flow, ctx.into_outcome())
            };
            self.apply_outcome(outcome)?;
            if matches!(flow, EventFlow::Consumed) {
                consumed = true;
                break;
            }
        }

        self.record_metric(HubMetrics::record_event);
        if !matches!(event, RuntimeEvent::Tick { .. }) {
            self.log_runtime_event(
                LogLevel::Debug,
                "event_dispatched",
                [
                    json_kv("event", json!(Self::describe_event(&event))),
                    json_kv("consumed", json!(consumed)),
                ],
            );
        }
        self.maybe_emit_metrics();
        Ok(())
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        for idx in 0..self.plugins.len() {
            let outcome = {
                let plugin = &mut self.plugins[idx];
                let mut ctx =
                    RuntimeContext::new(&self.rects, self.now, self.config.metrics.as_ref());
                plugin.before_render(&mut ctx)?;
                ctx.into_outcome()
            };
            self.apply_outcome(outcome)?;
        }

        if self.clear_requested {
            self.clear_requested = false;
            self.renderer.clear(stdout)?;
            self.registry.invalidate_all();
        }

        let dirty = self.registry.take_dirty();
        if !dirty.is_empty() {
            self.renderer.render(stdout, &dirty)?;
            let count = dirty.len();
            self.record_metric(|metrics| metrics.record_render(count));
            self.log_runtime_event(
                LogLevel::Trace,
                "render_completed",
                [json_kv("dirty_zones", json!(count))],
            );
        }

        // Content queued by before_render hooks lands in the next frame.
        self.redraw_requested = self.registry.has_dirty();
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: ContextOutcome) -> Result<()> {
        let ContextOutcome {
            zone_updates,
            redraw_requested,
            exit_requested,
        } = outcome;

        for (zone, content) in zone_updates {
            self.registry.apply_content(&zone, content)?;
        }

        if redraw_requested || self.registry.has_dirty() {
            self.redraw_requested = true;
        }

        if exit_requested && !self.should_exit {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }

        Ok(())
    }

    fn map_event(&mut self, event: CrosstermEvent) -> Result<Option<RuntimeEvent>> {
        let mapped = match event {
            CrosstermEvent::Key(key) => RuntimeEvent::Key(key),
            CrosstermEvent::Mouse(mouse) => RuntimeEvent::Mouse(mouse),
            CrosstermEvent::Paste(data) => RuntimeEvent::Paste(data),
            CrosstermEvent::FocusGained => RuntimeEvent::FocusGained,
            CrosstermEvent::FocusLost => RuntimeEvent::FocusLost,
            CrosstermEvent::Resize(width, height) => {
                let size = Size::new(width, height);
                self.handle_resize(size)?;
                RuntimeEvent::Resize(size)
            }
        };
        Ok(Some(mapped))
    }

    fn handle_resize(&mut self, size: Size) -> Result<()> {
        self.rects = self.layout.solve(size)?;
        self.registry.sync_layout(&self.rects);
        self.redraw_requested = true;
        self.clear_requested = true;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        self.last_metrics_emit = self.now;
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("plugins", json!(self.plugins.len())),
                json_kv("zones", json!(self.rects.len())),
            ],
        );

        for idx in 0..self.plugins.len() {
            let outcome = {
                let plugin = &mut self.plugins[idx];
                let plugin_name = plugin.name().to_string();
                let mut ctx =
                    RuntimeContext::new(&self.rects, self.now, self.config.metrics.as_ref());
                plugin.init(&mut ctx)?;
                self.log_runtime_event(
                    LogLevel::Debug,
                    "plugin_initialized",
                    [json_kv("plugin", json!(plugin_name))],
                );
                ctx.into_outcome()
            };
            self.apply_outcome(outcome)?;
        }

        self.render_if_needed(stdout)
    }

    fn finish(&mut self, result: &Result<()>) {
        if let Err(err) = result {
            self.log_runtime_event(
                LogLevel::Error,
                "runtime_failed",
                [json_kv("error", json!(err.to_string()))],
            );
        }
        self.finalize();
    }

    fn finalize(&mut self) {
        for plugin in self.plugins.iter_mut() {
            plugin.shutdown();
        }
        self.emit_metrics_snapshot();
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(self.now.as_millis() as u64))],
        );
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            logger.emit(level, TARGET_RUNTIME, message, fields);
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut HubMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics_interval.is_zero() {
            return;
        }
        if self.now.saturating_sub(self.last_metrics_emit) < self.config.metrics_interval {
            return;
        }
        self.last_metrics_emit = self.now;
        self.emit_metrics_snapshot();
    }

    fn emit_metrics_snapshot(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(self.now)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }

    fn describe_event(event: &RuntimeEvent) -> &'static str {
        match event {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Mouse(_) => "mouse",
            RuntimeEvent::Paste(_) => "paste",
            RuntimeEvent::FocusGained => "focus_gained",
            RuntimeEvent::FocusLost => "focus_lost",
            RuntimeEvent::Resize(_) => "resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    const ZONE: &str = "test:zone";

    struct SingleZone;

    impl ZoneLayout for SingleZone {
        fn solve(&self, size: Size) -> Result<HashMap<ZoneId, Rect>> {
            let mut rects = HashMap::new();
            rects.insert(ZONE.to_string(), Rect::new(0, 0, size.width, 1));
            Ok(rects)
        }
    }

    /// Shows the virtual clock and exits once it passes two seconds.
    struct ClockPlugin;

    impl HubPlugin for ClockPlugin {
        fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
            ctx.set_zone(ZONE, "t=0");
            Ok(())
        }

        fn on_event(
            &mut self,
            ctx: &mut RuntimeContext<'_>,
            event: &RuntimeEvent,
        ) -> Result<EventFlow> {
            if let RuntimeEvent::Tick { .. } = event {
                ctx.set_zone(ZONE, format!("t={}", ctx.now().as_millis()));
                if ctx.now() >= Duration::from_secs(2) {
                    ctx.request_exit();
                }
                return Ok(EventFlow::Consumed);
            }
            Ok(EventFlow::Continue)
        }
    }

    fn tick(ms: u64) -> RuntimeEvent {
        RuntimeEvent::Tick {
            elapsed: Duration::from_millis(ms),
        }
    }

    #[test]
    fn ticks_advance_virtual_clock_and_exit_stops_script() {
        let mut runtime =
            HubRuntime::new(Box::new(SingleZone), AnsiRenderer::with_default(), Size::new(20, 5))
                .unwrap();
        runtime.register_plugin(ClockPlugin);

        let mut output = Vec::new();
        runtime
            .run_scripted(&mut output, vec![tick(1500), tick(500), tick(500)])
            .unwrap();

        assert_eq!(runtime.now(), Duration::from_millis(2000));
        assert_eq!(runtime.zone_text(ZONE), Some("t=2000"));
        let rendered = String::from_utf8_lossy(&output);
        assert!(rendered.contains("t=1500"));
    }

    #[test]
    fn lifecycle_and_metrics_are_logged() {
        let sink = MemorySink::new();
        let mut config = RuntimeConfig {
            logger: Some(Logger::new(sink.clone())),
            metrics_interval: Duration::from_secs(1),
            ..RuntimeConfig::default()
        };
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();
        let mut runtime = HubRuntime::with_config(
            Box::new(SingleZone),
            AnsiRenderer::with_default(),
            Size::new(20, 5),
            config,
        )
        .unwrap();
        runtime.register_plugin(ClockPlugin);

        let mut output = Vec::new();
        runtime
            .run_scripted(&mut output, vec![tick(1000), tick(1000)])
            .unwrap();

        let messages = sink.messages();
        assert_eq!(messages.first().map(String::as_str), Some("runtime_started"));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));
        assert!(messages.iter().any(|message| message == "hub_metrics"));

        let snapshot = metrics.lock().unwrap().snapshot(Duration::ZERO);
        assert_eq!(snapshot.events, 2);
        assert!(snapshot.renders >= 2);
    }

    #[test]
    fn unknown_zone_update_is_an_error() {
        struct BadPlugin;
        impl HubPlugin for BadPlugin {
            fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
                ctx.set_zone("nope", "x");
                Ok(())
            }
        }

        let mut runtime =
            HubRuntime::new(Box::new(SingleZone), AnsiRenderer::with_default(), Size::new(20, 5))
                .unwrap();
        runtime.register_plugin(BadPlugin);
        let mut output = Vec::new();
        let err = runtime
            .run_scripted(&mut output, std::iter::empty())
            .unwrap_err();
        assert!(matches!(err, crate::HubError::ZoneNotFound(_)));
    }

    #[test]
    fn plugins_shut_down_when_an_event_fails() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct FailingPlugin {
            shut_down: Arc<AtomicBool>,
        }

        impl HubPlugin for FailingPlugin {
            fn on_event(
                &mut self,
                _ctx: &mut RuntimeContext<'_>,
                event: &RuntimeEvent,
            ) -> Result<EventFlow> {
                match event {
                    RuntimeEvent::FocusLost => Err(crate::HubError::Backend("lost".to_string())),
                    _ => Ok(EventFlow::Continue),
                }
            }

            fn shutdown(&mut self) {
                self.shut_down.store(true, Ordering::SeqCst);
            }
        }

        let sink = MemorySink::new();
        let shut_down = Arc::new(AtomicBool::new(false));
        let config = RuntimeConfig {
            logger: Some(Logger::new(sink.clone())),
            ..RuntimeConfig::default()
        };
        let mut runtime = HubRuntime::with_config(
            Box::new(SingleZone),
            AnsiRenderer::with_default(),
            Size::new(20, 5),
            config,
        )
        .unwrap();
        runtime.register_plugin(FailingPlugin {
            shut_down: Arc::clone(&shut_down),
        });

        let mut output = Vec::new();
        let result = runtime.run_scripted(
            &mut output,
            vec![tick(100), RuntimeEvent::FocusLost, tick(100)],
        );

        assert!(matches!(result, Err(crate::HubError::Backend(_))));
        assert!(shut_down.load(Ordering::SeqCst));
        let messages = sink.messages();
        assert!(messages.iter().any(|message| message == "runtime_failed"));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));
    }
}
