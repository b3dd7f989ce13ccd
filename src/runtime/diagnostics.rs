use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use serde_json::json;

use crate::Result;
use crate::logging::{LogLevel, Logger, json_kv};

use super::{EventFlow, HubPlugin, RuntimeContext, RuntimeEvent};

pub const TARGET_LIFECYCLE: &str = "hub::runtime.lifecycle";

/// Which input the lifecycle logger records. Focus and resize are always logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSelection {
    pub keys: bool,
    /// Clicks and scrolls; pointer motion is never logged.
    pub pointer: bool,
    pub paste: bool,
    pub clock: bool,
}

impl Default for InputSelection {
    fn default() -> Self {
        Self {
            keys: true,
            pointer: true,
            paste: false,
            clock: false,
        }
    }
}

/// Logs visitor input and terminal changes against the hub's virtual clock
/// and zones. Never consumes events.
pub struct LifecycleLoggerPlugin {
    logger: Logger,
    level: LogLevel,
    selection: InputSelection,
}

impl LifecycleLoggerPlugin {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            selection: InputSelection::default(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_selection(mut self, selection: InputSelection) -> Self {
        self.selection = selection;
        self
    }

    fn emit(
        &self,
        ctx: &RuntimeContext<'_>,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        let at = json_kv("at_ms", json!(ctx.now().as_millis() as u64));
        self.logger.emit(
            self.level,
            TARGET_LIFECYCLE,
            message,
            std::iter::once(at).chain(fields),
        );
    }

    fn key(&self, ctx: &RuntimeContext<'_>, key: &KeyEvent) {
        self.emit(
            ctx,
            "input.key",
            [
                json_kv("code", json!(format!("{:?}", key.code))),
                json_kv("modifiers", json!(format!("{:?}", key.modifiers))),
            ],
        );
    }

    fn pointer(&self, ctx: &RuntimeContext<'_>, mouse: &MouseEvent) {
        let action = match mouse.kind {
            MouseEventKind::Down(_) => "click",
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => "scroll",
            _ => return,
        };
        self.emit(
            ctx,
            "input.pointer",
            [
                json_kv("action", json!(action)),
                json_kv("zone", json!(ctx.zone_at(mouse.column, mouse.row))),
                json_kv("column", json!(mouse.column)),
                json_kv("row", json!(mouse.row)),
            ],
        );
    }
}

impl HubPlugin for LifecycleLoggerPlugin {
    fn name(&self) -> &str {
        "diagnostics.lifecycle_logger"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.emit(
            ctx,
            "lifecycle.attached",
            [
                json_kv("keys", json!(self.selection.keys)),
                json_kv("pointer", json!(self.selection.pointer)),
            ],
        );
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        match event {
            RuntimeEvent::Key(key) if self.selection.keys => self.key(ctx, key),
            RuntimeEvent::Mouse(mouse) if self.selection.pointer => self.pointer(ctx, mouse),
            RuntimeEvent::Paste(data) if self.selection.paste => {
                self.emit(ctx, "input.paste", [json_kv("chars", json!(data.chars().count()))]);
            }
            RuntimeEvent::Tick { elapsed } if self.selection.clock => {
                self.emit(
                    ctx,
                    "clock.advanced",
                    [json_kv("elapsed_ms", json!(elapsed.as_millis() as u64))],
                );
            }
            RuntimeEvent::FocusGained | RuntimeEvent::FocusLost => {
                let focused = matches!(event, RuntimeEvent::FocusGained);
                self.emit(ctx, "terminal.focus", [json_kv("focused", json!(focused))]);
            }
            RuntimeEvent::Resize(size) => {
                self.emit(
                    ctx,
                    "terminal.resize",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                );
            }
            _ => {}
        }

        Ok(EventFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::runtime::{HubRuntime, ZoneLayout};
    use crate::{AnsiRenderer, Rect, Size, ZoneId};
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton};
    use std::collections::HashMap;
    use std::time::Duration;

    struct LinksOnly;

    impl ZoneLayout for LinksOnly {
        fn solve(&self, _size: Size) -> Result<HashMap<ZoneId, Rect>> {
            let mut rects = HashMap::new();
            rects.insert("hub:page.links".to_string(), Rect::new(2, 2, 10, 4));
            Ok(rects)
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> RuntimeEvent {
        RuntimeEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn input_is_stamped_with_virtual_time_and_zone() {
        let sink = MemorySink::new();
        let mut runtime =
            HubRuntime::new(Box::new(LinksOnly), AnsiRenderer::with_default(), Size::new(20, 8))
                .unwrap();
        runtime.register_plugin(LifecycleLoggerPlugin::new(Logger::new(sink.clone())));

        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                vec![
                    RuntimeEvent::Tick {
                        elapsed: Duration::from_millis(1500),
                    },
                    RuntimeEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
                    mouse(MouseEventKind::Moved, 3, 3),
                    mouse(MouseEventKind::Down(MouseButton::Left), 3, 3),
                    mouse(MouseEventKind::Down(MouseButton::Left), 15, 7),
                    RuntimeEvent::FocusLost,
                ],
            )
            .unwrap();

        assert_eq!(
            sink.messages(),
            vec![
                "lifecycle.attached",
                "input.key",
                "input.pointer",
                "input.pointer",
                "terminal.focus",
            ]
        );
        let events = sink.events();
        assert!(events.iter().all(|event| event.target == TARGET_LIFECYCLE));
        assert_eq!(events[1].field("at_ms"), Some(&json!(1500)));
        assert_eq!(events[2].field("zone"), Some(&json!("hub:page.links")));
        assert_eq!(events[3].field("zone"), Some(&serde_json::Value::Null));
        assert_eq!(events[4].field("focused"), Some(&json!(false)));
    }
}
