//! Visited-topic history.
//!
//! Most-recent-first, unique case-insensitively, capped at a configurable
//! length and persisted as a JSON `string[]` under the `history` key.

use std::sync::Arc;

use infinipedia_core::Topic;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::kv::KeyValueStore;

/// Storage key for the history list.
pub const HISTORY_KEY: &str = "history";

/// Default number of remembered topics.
pub const DEFAULT_HISTORY_LIMIT: usize = 8;

/// Ordered, de-duplicated, bounded list of visited topics.
#[derive(Debug)]
pub struct HistoryTracker {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    entries: watch::Sender<Vec<Topic>>,
}

impl HistoryTracker {
    /// Loads the history from `store`.
    ///
    /// Content that is not a JSON array is treated as corrupted: the entry is
    /// removed and the history starts empty. Array elements that are not
    /// non-blank strings are dropped. Never fails.
    pub fn load(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let limit = limit.max(1);
        let entries = match store.get(HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match parse_entries(&raw, limit) {
                Some(entries) => entries,
                None => {
                    warn!("Stored history is corrupted, resetting");
                    store.remove(HISTORY_KEY);
                    Vec::new()
                }
            },
        };
        debug!(count = entries.len(), limit, "History loaded");

        let (entries, _) = watch::channel(entries);
        Self {
            store,
            limit,
            entries,
        }
    }

    /// Moves `topic` to the front, persists, and publishes the new list.
    ///
    /// Returns the updated list.
    pub fn record(&self, topic: &Topic) -> Vec<Topic> {
        let mut updated = Vec::new();
        self.entries.send_modify(|entries| {
            entries.retain(|existing| existing != topic);
            entries.insert(0, topic.clone());
            entries.truncate(self.limit);
            self.persist(entries);
            updated.clone_from(entries);
        });
        debug!(topic = %topic, count = updated.len(), "History recorded");
        updated
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> Vec<Topic> {
        self.entries.borrow().clone()
    }

    /// Entry at `index` (0 = most recent).
    pub fn get(&self, index: usize) -> Option<Topic> {
        self.entries.borrow().get(index).cloned()
    }

    /// Maximum number of entries.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Subscribes to list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Topic>> {
        self.entries.subscribe()
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        self.entries.send_modify(|entries| {
            entries.clear();
            self.store.remove(HISTORY_KEY);
        });
        debug!("History cleared");
    }

    fn persist(&self, entries: &[Topic]) {
        match serde_json::to_string(entries) {
            Ok(json) => self.store.set(HISTORY_KEY, &json),
            Err(e) => warn!(error = %e, "Failed to serialize history"),
        }
    }
}

/// Parses stored history. `None` means the content is unusable.
fn parse_entries(raw: &str, limit: usize) -> Option<Vec<Topic>> {
    let Value::Array(items) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };

    let mut entries: Vec<Topic> = Vec::with_capacity(items.len().min(limit));
    for topic in items.iter().filter_map(Value::as_str).filter_map(Topic::parse) {
        if !entries.contains(&topic) {
            entries.push(topic);
        }
        if entries.len() == limit {
            break;
        }
    }
    Some(entries)
}
