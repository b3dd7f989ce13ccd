use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::LinkOverride;
use crate::error::Result;
use crate::logging::{LogLevel, Logger, TARGET_PAGE, json_kv};

/// The four destinations the page links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Menu,
    Messaging,
    Location,
    Social,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        LinkKind::Menu,
        LinkKind::Messaging,
        LinkKind::Location,
        LinkKind::Social,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Menu => "menu",
            LinkKind::Messaging => "messaging",
            LinkKind::Location => "location",
            LinkKind::Social => "social",
        }
    }

    /// Glyph drawn in front of the label.
    pub fn glyph(self) -> char {
        match self {
            LinkKind::Menu => '🍝',
            LinkKind::Messaging => '💬',
            LinkKind::Location => '📍',
            LinkKind::Social => '📷',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLink {
    pub kind: LinkKind,
    pub label: String,
    pub url: String,
    pub aria_label: String,
}

impl TargetLink {
    pub fn new(
        kind: LinkKind,
        label: impl Into<String>,
        url: impl Into<String>,
        aria_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            url: url.into(),
            aria_label: aria_label.into(),
        }
    }
}

/// Ordered, immutable link table rendered top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<TargetLink>,
}

impl Default for LinkTable {
    fn default() -> Self {
        Self {
            links: vec![
                TargetLink::new(
                    LinkKind::Menu,
                    "Cardápio Online - Delivery",
                    "https://growmoneydigital.com.br/fetuccine/cardapio",
                    "Acessar cardápio online para delivery",
                ),
                TargetLink::new(
                    LinkKind::Messaging,
                    "Peça pelo nosso WhatsApp",
                    "https://w.app/fetuccine",
                    "Fazer pedido via WhatsApp",
                ),
                TargetLink::new(
                    LinkKind::Location,
                    "Localização",
                    "https://maps.app.goo.gl/jBnNHcUueJtmS8iq7",
                    "Ver localização no Google Maps",
                ),
                TargetLink::new(
                    LinkKind::Social,
                    "Instagram",
                    "https://www.instagram.com/fetuccineeldorado/",
                    "Seguir no Instagram",
                ),
            ],
        }
    }
}

impl LinkTable {
    pub fn new(links: Vec<TargetLink>) -> Self {
        Self { links }
    }

    /// Default table with configured labels/destinations swapped in.
    pub fn with_overrides(overrides: &[LinkOverride]) -> Self {
        let mut table = Self::default();
        for entry in overrides {
            if let Some(link) = table.links.iter_mut().find(|link| link.kind == entry.kind) {
                if let Some(label) = &entry.label {
                    link.label = label.clone();
                }
                if let Some(url) = &entry.url {
                    link.url = url.clone();
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TargetLink> {
        self.links.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetLink> {
        self.links.iter()
    }

    pub fn position_of(&self, kind: LinkKind) -> Option<usize> {
        self.links.iter().position(|link| link.kind == kind)
    }
}

/// Which link, if any, is under the pointer or keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<usize>,
}

impl HoverState {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }

    /// Returns `true` when the hovered link changed.
    pub fn enter(&mut self, index: usize) -> bool {
        let changed = self.hovered != Some(index);
        self.hovered = Some(index);
        changed
    }

    pub fn leave(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    pub fn focus_next(&mut self, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let next = match self.hovered {
            Some(index) => (index + 1) % count,
            None => 0,
        };
        self.enter(next)
    }

    pub fn focus_prev(&mut self, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let prev = match self.hovered {
            Some(0) | None => count - 1,
            Some(index) => index - 1,
        };
        self.enter(prev)
    }
}

/// Hands a link's destination to whatever can open it. Destinations are
/// opaque strings; the hub never talks to them itself.
pub trait LinkOpener: Send {
    fn open(&mut self, link: &TargetLink) -> Result<()>;
}

/// Opener used by the terminal binary: records the request in the log.
pub struct LoggingOpener {
    logger: Option<Logger>,
}

impl LoggingOpener {
    pub fn new(logger: Option<Logger>) -> Self {
        Self { logger }
    }
}

impl LinkOpener for LoggingOpener {
    fn open(&mut self, link: &TargetLink) -> Result<()> {
        if let Some(logger) = &self.logger {
            logger.emit(
                LogLevel::Info,
                TARGET_PAGE,
                "link_opened",
                [
                    json_kv("kind", json!(link.kind.as_str())),
                    json_kv("url", json!(link.url)),
                    json_kv("aria_label", json!(link.aria_label)),
                ],
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_order_matches_page() {
        let table = LinkTable::default();
        let kinds: Vec<_> = table.iter().map(|link| link.kind).collect();
        assert_eq!(kinds, LinkKind::ALL.to_vec());
        assert_eq!(table.position_of(LinkKind::Location), Some(2));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let table = LinkTable::with_overrides(&[LinkOverride {
            kind: LinkKind::Messaging,
            label: None,
            url: Some("https://wa.me/5500000000".to_string()),
        }]);
        let link = table.get(1).unwrap();
        assert_eq!(link.label, "Peça pelo nosso WhatsApp");
        assert_eq!(link.url, "https://wa.me/5500000000");
    }

    #[test]
    fn logging_opener_records_destination_and_label() {
        let sink = crate::logging::MemorySink::new();
        let mut opener = LoggingOpener::new(Some(Logger::new(sink.clone())));
        let table = LinkTable::default();
        let link = table.get(0).unwrap();
        opener.open(link).unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "link_opened");
        assert_eq!(events[0].field("url"), Some(&json!(link.url)));
        assert_eq!(events[0].field("aria_label"), Some(&json!(link.aria_label)));
    }

    #[test]
    fn hover_cycles_and_leaves() {
        let mut hover = HoverState::default();
        assert!(hover.focus_prev(4));
        assert_eq!(hover.hovered(), Some(3));
        assert!(hover.focus_next(4));
        assert_eq!(hover.hovered(), Some(0));
        assert!(!hover.enter(0));
        assert!(hover.leave());
        assert!(!hover.leave());
    }
}
