use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde_json::json;

use crate::config::{HubConfig, PageCopy};
use crate::links::{HoverState, LinkOpener, LinkTable};
use crate::logging::{LogLevel, Logger, TARGET_PAGE, TARGET_WIDGETS, json_kv};
use crate::runtime::{EventFlow, HubPlugin, RuntimeContext, RuntimeEvent};
use crate::store::FlagStore;
use crate::tour::{HighlightMap, TourController, TourPresenter, TourTransition, TourView, link_interactive};
use crate::widgets::{CouponBadge, InstallCapability, InstallPrompt, OrderToastFeed};
use crate::width::{center_line, truncate_display, wrap_words};
use crate::Result;

use super::layout::{
    LINK_ROW_HEIGHT, MAX_COLUMN_WIDTH, TAGLINE_HEIGHT, ZONE_COUPON, ZONE_FOOTER, ZONE_HEADER,
    ZONE_INSTALL, ZONE_LINKS, ZONE_TAGLINE, ZONE_TOASTS, ZONE_TOUR, link_index_at,
};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const REVERSE: &str = "\x1b[7m";
const UNDERLINE: &str = "\x1b[4m";

/// Row of the tour zone holding the skip button.
pub const TOUR_SKIP_ROW: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Tagline,
    Links,
    Tour,
    Toasts,
    Coupon,
    Install,
    Footer,
}

impl Section {
    const ALL: [Section; 8] = [
        Section::Header,
        Section::Tagline,
        Section::Links,
        Section::Tour,
        Section::Toasts,
        Section::Coupon,
        Section::Install,
        Section::Footer,
    ];

    fn zone(self) -> &'static str {
        match self {
            Section::Header => ZONE_HEADER,
            Section::Tagline => ZONE_TAGLINE,
            Section::Links => ZONE_LINKS,
            Section::Tour => ZONE_TOUR,
            Section::Toasts => ZONE_TOASTS,
            Section::Coupon => ZONE_COUPON,
            Section::Install => ZONE_INSTALL,
            Section::Footer => ZONE_FOOTER,
        }
    }
}

/// The link hub page: owns the tour, the links and the cosmetic widgets and
/// writes each of them into its zone.
pub struct LinkHubPage {
    copy: PageCopy,
    links: LinkTable,
    hover: HoverState,
    tour: TourController,
    presenter: TourPresenter,
    toasts: OrderToastFeed,
    coupon: CouponBadge,
    install: InstallPrompt,
    opener: Box<dyn LinkOpener>,
    logger: Option<Logger>,
    toast_rows: usize,
    rendered_revision: Option<u64>,
}

impl LinkHubPage {
    pub fn new(
        config: &HubConfig,
        store: Box<dyn FlagStore>,
        install: Box<dyn InstallCapability>,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        Self {
            copy: config.page.clone(),
            links: LinkTable::with_overrides(&config.links),
            hover: HoverState::default(),
            tour: TourController::new(config.tour.clone(), store),
            presenter: TourPresenter::new(HighlightMap::default(), config.tour.countdown()),
            toasts: OrderToastFeed::new(config.toasts.clone()),
            coupon: CouponBadge::new(config.coupon.clone()),
            install: InstallPrompt::new(config.install.clone(), install),
            opener,
            logger: None,
            toast_rows: config.toasts.max_visible,
            rendered_revision: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.tour = self.tour.with_logger(logger.clone());
        self.logger = Some(logger);
        self
    }

    pub fn tour(&self) -> &TourController {
        &self.tour
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.hovered()
    }

    /// Current overlay, if the tour is showing.
    pub fn tour_view(&self) -> Option<TourView> {
        self.presenter.present(self.tour.snapshot(), &self.links)
    }

    /// Whether the link at `index` may be opened right now.
    pub fn is_link_interactive(&self, index: usize) -> bool {
        link_interactive(self.tour_view().as_ref(), index)
    }

    fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = &self.logger {
            logger.emit(level, target, message, fields);
        }
    }

    fn advance(&mut self, ctx: &mut RuntimeContext<'_>) {
        let now = ctx.now();
        let mut sections = Vec::new();

        let transitions = self.tour.advance_to(now);
        if !transitions.is_empty() {
            let count = transitions.len();
            ctx.record_metric(|metrics| {
                for _ in 0..count {
                    metrics.record_tour_transition();
                }
            });
        }

        let update = self.toasts.advance_to(now);
        if update.changed() {
            if update.shown > 0 {
                ctx.record_metric(|metrics| metrics.record_toasts(update.shown));
                self.log(
                    LogLevel::Debug,
                    TARGET_WIDGETS,
                    "toast_shown",
                    [json_kv("count", json!(update.shown))],
                );
            }
            sections.push(Section::Toasts);
        }
        if self.coupon.advance_to(now) {
            sections.push(Section::Coupon);
        }
        if self.install.advance_to(now) {
            self.log(LogLevel::Info, TARGET_WIDGETS, "install_prompt_shown", std::iter::empty());
            sections.push(Section::Install);
        }

        self.refresh(ctx, &sections);
        self.sync_tour(ctx);
    }

    /// Redraw the overlay and the links when the controller's revision moved.
    fn sync_tour(&mut self, ctx: &mut RuntimeContext<'_>) {
        let revision = self.tour.revision();
        if self.rendered_revision == Some(revision) {
            return;
        }
        self.rendered_revision = Some(revision);
        self.refresh(ctx, &[Section::Tour, Section::Links]);
    }

    fn on_tour_input(&mut self, ctx: &mut RuntimeContext<'_>, transition: Option<TourTransition>) {
        if transition.is_some() {
            ctx.record_metric(|metrics| metrics.record_tour_transition());
            self.sync_tour(ctx);
        }
    }

    fn handle_key(&mut self, ctx: &mut RuntimeContext<'_>, key: &KeyEvent) -> Result<EventFlow> {
        if key.kind == KeyEventKind::Release {
            return Ok(EventFlow::Continue);
        }

        let count = self.links.len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ctx.request_exit();
            }
            KeyCode::Char('q') => ctx.request_exit(),
            KeyCode::Esc => {
                let transition = self.tour.cancel();
                self.on_tour_input(ctx, transition);
            }
            KeyCode::Up | KeyCode::BackTab => self.hover_changed(ctx, |hover| hover.focus_prev(count)),
            KeyCode::Down | KeyCode::Tab => self.hover_changed(ctx, |hover| hover.focus_next(count)),
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                if index < count {
                    self.hover_changed(ctx, |hover| hover.enter(index));
                }
            }
            KeyCode::Enter => {
                if let Some(index) = self.hover.hovered() {
                    self.open_link(ctx, index);
                }
            }
            KeyCode::Char('c') => {
                if self.coupon.toggle() {
                    self.refresh(ctx, &[Section::Coupon]);
                }
            }
            KeyCode::Char('x') => {
                if self.coupon.dismiss() {
                    self.refresh(ctx, &[Section::Coupon]);
                }
            }
            KeyCode::Char('i') => {
                if let Some(outcome) = self.install.accept() {
                    self.log(
                        LogLevel::Info,
                        TARGET_WIDGETS,
                        "install_prompt_resolved",
                        [json_kv("outcome", json!(format!("{outcome:?}").to_lowercase()))],
                    );
                    self.refresh(ctx, &[Section::Install]);
                }
            }
            KeyCode::Char('n') => {
                if self.install.dismiss() {
                    self.log(
                        LogLevel::Info,
                        TARGET_WIDGETS,
                        "install_prompt_dismissed",
                        std::iter::empty(),
                    );
                    self.refresh(ctx, &[Section::Install]);
                }
            }
            _ => return Ok(EventFlow::Continue),
        }
        Ok(EventFlow::Consumed)
    }

    fn handle_mouse(&mut self, ctx: &mut RuntimeContext<'_>, mouse: &MouseEvent) -> EventFlow {
        let over_link = ctx
            .rect(ZONE_LINKS)
            .and_then(|rect| link_index_at(rect, mouse.column, mouse.row))
            .filter(|index| *index < self.links.len());

        match mouse.kind {
            MouseEventKind::Moved => {
                match over_link {
                    Some(index) => self.hover_changed(ctx, |hover| hover.enter(index)),
                    None => self.hover_changed(ctx, HoverState::leave),
                }
                EventFlow::Continue
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = over_link {
                    self.hover_changed(ctx, |hover| hover.enter(index));
                    self.open_link(ctx, index);
                    return EventFlow::Consumed;
                }
                let on_skip = ctx.rect(ZONE_TOUR).is_some_and(|rect| {
                    rect.contains(mouse.column, mouse.row) && mouse.row - rect.y == TOUR_SKIP_ROW
                });
                if on_skip {
                    let transition = self.tour.skip();
                    self.on_tour_input(ctx, transition);
                    return EventFlow::Consumed;
                }
                EventFlow::Continue
            }
            _ => EventFlow::Continue,
        }
    }

    fn hover_changed(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        update: impl FnOnce(&mut HoverState) -> bool,
    ) {
        if update(&mut self.hover) {
            self.log(
                LogLevel::Trace,
                TARGET_PAGE,
                "hover_changed",
                [json_kv("hovered", json!(self.hover.hovered()))],
            );
            self.refresh(ctx, &[Section::Links]);
        }
    }

    fn open_link(&mut self, ctx: &mut RuntimeContext<'_>, index: usize) {
        if !self.is_link_interactive(index) {
            self.log(
                LogLevel::Debug,
                TARGET_PAGE,
                "link_suppressed",
                [json_kv("index", json!(index))],
            );
            return;
        }
        let Some(link) = self.links.get(index) else {
            return;
        };
        match self.opener.open(link) {
            Ok(()) => ctx.record_metric(|metrics| metrics.record_link_open()),
            Err(err) => self.log(
                LogLevel::Warn,
                TARGET_PAGE,
                "link_open_failed",
                [
                    json_kv("kind", json!(link.kind.as_str())),
                    json_kv("error", json!(err.to_string())),
                ],
            ),
        }
    }

    fn refresh(&self, ctx: &mut RuntimeContext<'_>, sections: &[Section]) {
        for section in sections {
            let zone = section.zone();
            let Some(rect) = ctx.rect(zone) else {
                continue;
            };
            let width = rect.width.min(MAX_COLUMN_WIDTH);
            let content = self.draw(*section, width).join("\n");
            ctx.set_zone(zone, content);
        }
    }

    fn draw(&self, section: Section, width: u16) -> Vec<String> {
        match section {
            Section::Header => vec![
                styled(BOLD, &center_line(&format!("🍝 {}", self.copy.title), width)),
                styled(DIM, &center_line(&self.copy.logo_alt, width)),
            ],
            Section::Tagline => wrap_words(&self.copy.tagline, width as usize)
                .into_iter()
                .take(TAGLINE_HEIGHT as usize)
                .map(|line| center_line(&line, width))
                .collect(),
            Section::Links => self.draw_links(width),
            Section::Tour => self.draw_tour(width),
            Section::Toasts => self
                .toasts
                .visible()
                .take(self.toast_rows)
                .map(|toast| truncate_display(&format!("🛵 {}", toast.message()), width as usize))
                .collect(),
            Section::Coupon => fit_all(self.coupon.lines(), width),
            Section::Install => fit_all(self.install.lines(), width),
            Section::Footer => vec![styled(DIM, &center_line(&self.copy.footer, width))],
        }
    }

    fn draw_links(&self, width: u16) -> Vec<String> {
        let view = self.tour_view();
        let mut lines = Vec::with_capacity(self.links.len() * LINK_ROW_HEIGHT as usize);
        for (index, link) in self.links.iter().enumerate() {
            let highlighted = view.as_ref().and_then(|view| view.highlight) == Some(index);
            let hovered = self.hover.is_hovered(index);
            let marker = if highlighted {
                "▶"
            } else if hovered {
                "›"
            } else {
                " "
            };
            let text = truncate_display(
                &format!("{marker} [{}] {} {}", index + 1, link.kind.glyph(), link.label),
                width as usize,
            );
            let line = if highlighted {
                styled(&format!("{BOLD}{REVERSE}"), &text)
            } else if !link_interactive(view.as_ref(), index) {
                styled(DIM, &text)
            } else if hovered {
                styled(&format!("{BOLD}{UNDERLINE}"), &text)
            } else {
                text
            };
            lines.push(line);
            lines.push(String::new());
        }
        lines
    }

    fn draw_tour(&self, width: u16) -> Vec<String> {
        let Some(view) = self.tour_view() else {
            return Vec::new();
        };
        let limit = width as usize;

        let heading = match view.countdown {
            Some(countdown) => format!(
                "{}  {} {}s",
                view.title,
                countdown.gauge(),
                countdown.remaining
            ),
            None => view.title.to_string(),
        };
        let mut lines = vec![styled(BOLD, &truncate_display(&heading, limit))];

        let mut description = wrap_words(view.description, limit);
        description.resize(2, String::new());
        lines.extend(description.into_iter().take(2));

        lines.push(
            view.progress_dots()
                .map(|dots| center_line(&dots, width))
                .unwrap_or_default(),
        );
        lines.push(styled(
            REVERSE,
            &truncate_display(&format!("[ {} ] ({})", view.skip_label, view.skip_hint), limit),
        ));
        lines
    }
}

fn styled(style: &str, text: &str) -> String {
    format!("{style}{text}{RESET}")
}

fn fit_all(lines: Vec<String>, width: u16) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| truncate_display(&line, width as usize))
        .collect()
}

impl HubPlugin for LinkHubPage {
    fn name(&self) -> &str {
        "page.link_hub"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        let phase = self.tour.initialize();
        self.toasts.start();
        self.coupon.start();
        self.install.start();
        self.log(
            LogLevel::Info,
            TARGET_PAGE,
            "page_mounted",
            [
                json_kv("links", json!(self.links.len())),
                json_kv("tour_phase", json!(format!("{phase:?}").to_lowercase())),
            ],
        );
        self.refresh(ctx, &Section::ALL);
        self.rendered_revision = Some(self.tour.revision());
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        match event {
            RuntimeEvent::Tick { .. } => {
                self.advance(ctx);
                Ok(EventFlow::Continue)
            }
            RuntimeEvent::Key(key) => self.handle_key(ctx, key),
            RuntimeEvent::Mouse(mouse) => Ok(self.handle_mouse(ctx, mouse)),
            RuntimeEvent::Resize(_) => {
                self.refresh(ctx, &Section::ALL);
                Ok(EventFlow::Continue)
            }
            _ => Ok(EventFlow::Continue),
        }
    }

    fn shutdown(&mut self) {
        self.tour.unmount();
        self.toasts.stop();
        self.coupon.stop();
        self.install.stop();
        self.log(LogLevel::Info, TARGET_PAGE, "page_unmounted", std::iter::empty());
    }
}
