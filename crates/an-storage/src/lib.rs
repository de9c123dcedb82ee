//! Key-value persistence for the archetype site.
//!
//! The browser's `localStorage`, an in-process map and an on-disk RocksDB
//! database all sit behind [`KeyValueStore`]. Callers that must never fail
//! go through [`PersistenceBridge`] or [`TtlCache`].

pub mod bridge;
pub mod cache;
#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use bridge::{Channel, PersistenceBridge};
pub use cache::{DAY_MS, TtlCache};
#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbStore;

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Synchronous string store. Any call may fail, for example when the
/// browser refuses storage access in a private window.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Default)]
pub struct NoopStore;

impl KeyValueStore for NoopStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store that rejects every call. Stands in for a browser with storage
/// disabled.
#[derive(Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("storage unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("storage unavailable")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        anyhow::bail!("storage unavailable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() -> Result<()> {
        let store = MemoryStore::default();
        store.set("archetype-search-query", "dark")?;
        assert_eq!(store.get("archetype-search-query")?.as_deref(), Some("dark"));
        store.remove("archetype-search-query")?;
        assert_eq!(store.get("archetype-search-query")?, None);
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn shared_store_sees_writes_through_rc() -> Result<()> {
        let store = Rc::new(MemoryStore::default());
        let handle: Box<dyn KeyValueStore> = Box::new(store.clone());
        handle.set("k", "v")?;
        assert_eq!(store.get("k")?.as_deref(), Some("v"));
        Ok(())
    }
}
