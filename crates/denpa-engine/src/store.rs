use std::collections::HashMap;

use crate::protocol::EngineEvent;

/// Latest countdown state published by the engine for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownEntry {
    pub countdown: String,
    pub is_airing: bool,
    pub has_aired: bool,
    pub progress: Option<f64>,
}

/// Host-side cache of the engine's countdown events, keyed by item id so
/// concurrently airing items update independently.
///
/// Per-tick display state only; never a source of truth.
#[derive(Debug, Clone, Default)]
pub struct CountdownStore {
    entries: HashMap<String, CountdownEntry>,
}

impl CountdownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one engine event into the store. Notification events pass
    /// through untouched.
    pub fn apply(&mut self, event: &EngineEvent) {
        if let EngineEvent::Countdown {
            item_id,
            countdown,
            is_airing,
            has_aired,
            progress,
        } = event
        {
            self.entries.insert(
                item_id.clone(),
                CountdownEntry {
                    countdown: countdown.clone(),
                    is_airing: *is_airing,
                    has_aired: *has_aired,
                    progress: *progress,
                },
            );
        }
    }

    pub fn get(&self, item_id: &str) -> Option<&CountdownEntry> {
        self.entries.get(item_id)
    }

    pub fn snapshot(&self) -> &HashMap<String, CountdownEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
