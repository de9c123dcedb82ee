//! Expiring JSON values in a [`KeyValueStore`].
//!
//! A value lives under `key` and its expiry (epoch milliseconds) under
//! `{key}-expiry`. Time is passed in by the caller.

use crate::KeyValueStore;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

pub struct TtlCache<S> {
    store: S,
    key: String,
    ttl_ms: u64,
}

impl<S: KeyValueStore> TtlCache<S> {
    pub fn new(store: S, key: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            store,
            key: key.into(),
            ttl_ms,
        }
    }

    pub fn expiry_key(&self) -> String {
        format!("{}-expiry", self.key)
    }

    /// Cached value if it has not expired at `now_ms`.
    pub fn get_fresh<T: DeserializeOwned>(&self, now_ms: u64) -> Result<Option<T>> {
        let Some(expiry) = self.store.get(&self.expiry_key())? else {
            return Ok(None);
        };
        let expiry: u64 = expiry
            .trim()
            .parse()
            .with_context(|| format!("invalid expiry stamp for {}", self.key))?;
        if now_ms >= expiry {
            debug!(key = %self.key, "cache entry expired");
            return Ok(None);
        }
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("failed to decode cached {}", self.key))?;
        Ok(Some(value))
    }

    pub fn put<T: Serialize>(&self, value: &T, now_ms: u64) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, &raw)?;
        self.store
            .set(&self.expiry_key(), &(now_ms + self.ttl_ms).to_string())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        self.store.remove(&self.expiry_key())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[test]
    fn entry_expires_after_ttl() -> Result<()> {
        let store = Rc::new(MemoryStore::default());
        let cache = TtlCache::new(store.clone(), "archetype-dates-cache", DAY_MS);
        let dates: HashMap<String, String> = [("Eldlich".to_owned(), "2019-11-08".to_owned())].into();
        cache.put(&dates, 1_000)?;

        assert_eq!(
            store.get("archetype-dates-cache-expiry")?.as_deref(),
            Some("86401000")
        );
        let hit: Option<HashMap<String, String>> = cache.get_fresh(1_000 + DAY_MS - 1)?;
        assert_eq!(hit, Some(dates));
        let miss: Option<HashMap<String, String>> = cache.get_fresh(1_000 + DAY_MS)?;
        assert_eq!(miss, None);
        Ok(())
    }

    #[test]
    fn missing_or_cleared_entry_is_a_miss() -> Result<()> {
        let cache = TtlCache::new(MemoryStore::default(), "banlist-tcg", DAY_MS);
        assert_eq!(cache.get_fresh::<Vec<String>>(0)?, None);
        cache.put(&vec!["Pot of Greed"], 0)?;
        cache.clear()?;
        assert_eq!(cache.get_fresh::<Vec<String>>(1)?, None);
        Ok(())
    }
}
