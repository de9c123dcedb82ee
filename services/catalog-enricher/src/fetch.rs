use an_api_types::{ApiCard, CardSetInfo};
use an_card_client::CardDatabase;
use an_storage::{KeyValueStore, TtlCache};
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

const SETS_KEY: &str = "ygoprodeck:cardsets";
const CARDS_KEY: &str = "ygoprodeck:cardinfo";

/// Card database front with an optional response cache between runs.
pub(crate) struct CardSource<D> {
    db: D,
    store: Option<Box<dyn KeyValueStore>>,
    ttl_ms: u64,
}

impl<D: CardDatabase> CardSource<D> {
    pub(crate) fn new(db: D, store: Option<Box<dyn KeyValueStore>>, ttl_ms: u64) -> Self {
        Self { db, store, ttl_ms }
    }

    pub(crate) async fn card_sets(&self) -> Result<Vec<CardSetInfo>> {
        if let Some(sets) = self.cached(SETS_KEY) {
            return Ok(sets);
        }
        let sets = self.db.card_sets().await.context("failed to fetch card sets")?;
        self.remember(SETS_KEY, &sets);
        Ok(sets)
    }

    pub(crate) async fn all_cards(&self) -> Result<Vec<ApiCard>> {
        if let Some(cards) = self.cached(CARDS_KEY) {
            return Ok(cards);
        }
        let cards = self.db.all_cards().await.context("failed to fetch card info")?;
        self.remember(CARDS_KEY, &cards);
        Ok(cards)
    }

    fn cache(&self, key: &str) -> Option<TtlCache<&dyn KeyValueStore>> {
        let store = self.store.as_deref()?;
        Some(TtlCache::new(store, key, self.ttl_ms))
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache(key)?;
        match cache.get_fresh(now_ms()) {
            Ok(Some(value)) => {
                info!(key, "using cached response");
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable cached response");
                None
            }
        }
    }

    fn remember<T: Serialize>(&self, key: &str, value: &T) {
        if let Some(cache) = self.cache(key) {
            if let Err(err) = cache.put(value, now_ms()) {
                warn!(key, error = %err, "failed to cache response");
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
