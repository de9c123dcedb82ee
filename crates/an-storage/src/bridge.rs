//! Persistence bridge for the catalog page's scroll offset, alphabet letter
//! and search text.
//!
//! Every value is mirrored in memory. The first store failure is logged and
//! the bridge stays memory-only for the rest of the session.

use crate::KeyValueStore;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Scroll,
    Letter,
    Search,
}

impl Channel {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Scroll => "archetype-scroll-position",
            Self::Letter => "archetype-alphabet-filter",
            Self::Search => "archetype-search-query",
        }
    }
}

pub struct PersistenceBridge<S> {
    store: S,
    memory: RefCell<HashMap<Channel, String>>,
    degraded: Cell<bool>,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            memory: RefCell::new(HashMap::new()),
            degraded: Cell::new(false),
        }
    }

    /// True once the backing store has failed and only memory is used.
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    pub fn save(&self, channel: Channel, value: &str) {
        self.memory.borrow_mut().insert(channel, value.to_owned());
        if self.degraded.get() {
            return;
        }
        if let Err(err) = self.store.set(channel.key(), value) {
            self.degrade(channel, &err);
        }
    }

    pub fn restore(&self, channel: Channel) -> Option<String> {
        if !self.degraded.get() {
            match self.store.get(channel.key()) {
                Ok(value) => return value,
                Err(err) => self.degrade(channel, &err),
            }
        }
        self.memory.borrow().get(&channel).cloned()
    }

    pub fn clear(&self, channel: Channel) {
        self.memory.borrow_mut().remove(&channel);
        if self.degraded.get() {
            return;
        }
        if let Err(err) = self.store.remove(channel.key()) {
            self.degrade(channel, &err);
        }
    }

    pub fn save_scroll(&self, offset: f64) {
        self.save(Channel::Scroll, &offset.to_string());
    }

    /// Saved scroll offset, if it parses to a finite number.
    pub fn restore_scroll(&self) -> Option<f64> {
        self.restore(Channel::Scroll)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|offset| offset.is_finite())
    }

    pub fn save_letter(&self, letter: &str) {
        self.save(Channel::Letter, letter);
    }

    pub fn restore_letter(&self) -> Option<String> {
        self.restore(Channel::Letter)
    }

    pub fn save_search(&self, query: &str) {
        self.save(Channel::Search, query);
    }

    pub fn restore_search(&self) -> Option<String> {
        self.restore(Channel::Search)
    }

    fn degrade(&self, channel: Channel, err: &anyhow::Error) {
        warn!(key = channel.key(), error = %err, "storage unavailable, keeping values in memory");
        self.degraded.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, UnavailableStore};
    use std::rc::Rc;

    #[test]
    fn scroll_offset_survives_reload() {
        let storage = Rc::new(MemoryStore::default());
        let before = PersistenceBridge::new(storage.clone());
        before.save_scroll(1834.5);
        drop(before);

        let after = PersistenceBridge::new(storage);
        assert_eq!(after.restore_scroll(), Some(1834.5));
    }

    #[test]
    fn failing_store_degrades_to_memory() {
        let bridge = PersistenceBridge::new(UnavailableStore);
        bridge.save_letter("d");
        assert!(bridge.is_degraded());
        assert_eq!(bridge.restore_letter().as_deref(), Some("d"));

        bridge.clear(Channel::Letter);
        assert_eq!(bridge.restore_letter(), None);
    }

    #[test]
    fn read_failure_falls_back_without_panicking() {
        let bridge = PersistenceBridge::new(UnavailableStore);
        assert_eq!(bridge.restore_search(), None);
        assert!(bridge.is_degraded());
    }

    #[test]
    fn channels_use_distinct_keys() {
        let storage = Rc::new(MemoryStore::default());
        let bridge = PersistenceBridge::new(storage.clone());
        bridge.save_search("hero");
        bridge.save_letter("all");
        bridge.save_scroll(0.0);
        assert_eq!(storage.len(), 3);

        bridge.clear(Channel::Search);
        assert_eq!(bridge.restore_search(), None);
        assert_eq!(bridge.restore_letter().as_deref(), Some("all"));
    }

    #[test]
    fn garbage_scroll_value_is_ignored() -> anyhow::Result<()> {
        let storage = Rc::new(MemoryStore::default());
        storage.set(Channel::Scroll.key(), "top")?;
        let bridge = PersistenceBridge::new(storage);
        assert_eq!(bridge.restore_scroll(), None);
        Ok(())
    }
}
