use std::collections::{HashMap, HashSet};

use blake3::Hash;

use crate::error::{HubError, Result};
use crate::geometry::Rect;

pub type ZoneId = String;

/// Pre-laid-out zone text: one terminal row per line, ANSI styling allowed.
pub type ZoneContent = String;

#[derive(Debug, Clone)]
pub struct ZoneState {
    pub rect: Rect,
    pub content: ZoneContent,
    hash: Option<Hash>,
    pub is_dirty: bool,
}

impl ZoneState {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            content: ZoneContent::new(),
            hash: None,
            is_dirty: true,
        }
    }

    fn update_content(&mut self, content: ZoneContent) {
        let new_hash = blake3::hash(content.as_bytes());
        if self.hash != Some(new_hash) {
            self.content = content;
            self.hash = Some(new_hash);
            self.is_dirty = true;
        }
    }
}

/// Maps the page's zones to their rectangles and last rendered content.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    entries: HashMap<ZoneId, ZoneState>,
    dirty: HashSet<ZoneId>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt freshly solved rectangles. Moved or new zones become dirty and
    /// zones missing from `solved_rects` are dropped.
    pub fn sync_layout(&mut self, solved_rects: &HashMap<ZoneId, Rect>) {
        self.entries.retain(|id, _| solved_rects.contains_key(id));
        self.dirty.retain(|id| solved_rects.contains_key(id));

        for (id, rect) in solved_rects {
            let state = self
                .entries
                .entry(id.clone())
                .or_insert_with(|| ZoneState::new(*rect));
            if state.rect != *rect || state.is_dirty {
                state.rect = *rect;
                state.is_dirty = true;
                self.dirty.insert(id.clone());
            }
        }
    }

    /// Mark every zone dirty, e.g. after the screen was cleared.
    pub fn invalidate_all(&mut self) {
        for (id, state) in self.entries.iter_mut() {
            state.is_dirty = true;
            self.dirty.insert(id.clone());
        }
    }

    pub fn apply_content(&mut self, zone_id: &str, content: ZoneContent) -> Result<()> {
        let entry = self
            .entries
            .get_mut(zone_id)
            .ok_or_else(|| HubError::ZoneNotFound(zone_id.to_string()))?;
        entry.update_content(content);
        if entry.is_dirty {
            self.dirty.insert(zone_id.to_string());
        }
        Ok(())
    }

    pub fn take_dirty(&mut self) -> Vec<(ZoneId, ZoneState)> {
        let mut ids: Vec<_> = self.dirty.drain().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| {
                self.entries.get_mut(&id).map(|state| {
                    state.is_dirty = false;
                    (id.clone(), state.clone())
                })
            })
            .collect()
    }

    pub fn content_of(&self, zone_id: &str) -> Option<&str> {
        self.entries.get(zone_id).map(|state| state.content.as_str())
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}
