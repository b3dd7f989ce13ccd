//! Pure mapping from a [`TourSnapshot`] to what the overlay shows.

use crate::links::{LinkKind, LinkTable};

use super::controller::{TERMINAL_STEP, TourSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourStepCopy {
    pub title: &'static str,
    pub description: &'static str,
}

/// Copy for steps 0..=3 (one per link) followed by the terminal step.
pub const TOUR_STEPS: [TourStepCopy; 5] = [
    TourStepCopy {
        title: "Cardápio Online",
        description: "Aqui você acessa nosso cardápio completo e faz pedidos para delivery",
    },
    TourStepCopy {
        title: "WhatsApp",
        description: "Prefere WhatsApp? Fale diretamente conosco e faça seu pedido",
    },
    TourStepCopy {
        title: "Localização",
        description: "Veja nossa localização e venha nos visitar pessoalmente",
    },
    TourStepCopy {
        title: "Instagram",
        description: "Siga-nos no Instagram para novidades, promoções e fotos deliciosas",
    },
    TourStepCopy {
        title: "Tour Concluído!",
        description: "🍝 Escolha uma opção acima e aproveite!",
    },
];

pub const SKIP_LABEL: &str = "Pular tour";
pub const SKIP_HINT: &str = "Esc";

/// Which link each non-terminal step highlights. Resolved against the link
/// table by kind, so reordering the table moves the highlight with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightMap {
    steps: [LinkKind; 4],
}

impl Default for HighlightMap {
    fn default() -> Self {
        Self {
            steps: LinkKind::ALL,
        }
    }
}

impl HighlightMap {
    pub fn new(steps: [LinkKind; 4]) -> Self {
        Self { steps }
    }

    pub fn kind_for_step(&self, step: u8) -> Option<LinkKind> {
        self.steps.get(step as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub remaining: u8,
    pub total: u8,
}

impl Countdown {
    /// Ring-style gauge: one filled dot per remaining second.
    pub fn gauge(&self) -> String {
        let filled = self.remaining.min(self.total) as usize;
        let empty = self.total as usize - filled;
        let mut gauge = "●".repeat(filled);
        gauge.push_str(&"○".repeat(empty));
        gauge
    }
}

/// Everything the host page needs to draw the overlay for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourView {
    pub step: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub countdown: Option<Countdown>,
    /// One entry per link step, `true` for the current one.
    pub progress: Option<[bool; 4]>,
    /// Position in the link table of the live link.
    pub highlight: Option<usize>,
    pub skip_label: &'static str,
    pub skip_hint: &'static str,
    pub terminal: bool,
}

impl TourView {
    /// Whether the link at `index` accepts interaction under this view.
    pub fn allows(&self, index: usize) -> bool {
        match self.highlight {
            Some(live) if !self.terminal => live == index,
            _ => true,
        }
    }

    pub fn progress_dots(&self) -> Option<String> {
        self.progress.map(|dots| {
            dots.iter()
                .map(|current| if *current { "━━" } else { "·" })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// Stateless presenter configured with the highlight mapping and countdown length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourPresenter {
    highlight: HighlightMap,
    countdown_total: u8,
}

impl TourPresenter {
    pub fn new(highlight: HighlightMap, countdown_total: u8) -> Self {
        Self {
            highlight,
            countdown_total: countdown_total.max(1),
        }
    }

    pub fn present(&self, snapshot: TourSnapshot, links: &LinkTable) -> Option<TourView> {
        if !snapshot.active {
            return None;
        }

        let snapshot = snapshot.clamped();
        let copy = TOUR_STEPS[snapshot.step as usize];
        if snapshot.step == TERMINAL_STEP {
            return Some(TourView {
                step: snapshot.step,
                title: copy.title,
                description: copy.description,
                countdown: None,
                progress: None,
                highlight: None,
                skip_label: SKIP_LABEL,
                skip_hint: SKIP_HINT,
                terminal: true,
            });
        }

        let mut progress = [false; 4];
        progress[snapshot.step as usize] = true;
        let highlight = self
            .highlight
            .kind_for_step(snapshot.step)
            .and_then(|kind| links.position_of(kind));

        Some(TourView {
            step: snapshot.step,
            title: copy.title,
            description: copy.description,
            countdown: Some(Countdown {
                remaining: snapshot.time_left.clamp(1, self.countdown_total),
                total: self.countdown_total,
            }),
            progress: Some(progress),
            highlight,
            skip_label: SKIP_LABEL,
            skip_hint: SKIP_HINT,
            terminal: false,
        })
    }
}

impl Default for TourPresenter {
    fn default() -> Self {
        Self::new(HighlightMap::default(), 4)
    }
}

/// Host-page question: may the link at `index` be used right now?
pub fn link_interactive(view: Option<&TourView>, index: usize) -> bool {
    view.map(|view| view.allows(index)).unwrap_or(true)
}
