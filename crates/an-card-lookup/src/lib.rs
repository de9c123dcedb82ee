//! Card lookup widget core.
//!
//! [`CardLookup`] owns the name-keyed card cache, the banlist snapshot and
//! the popup state. It is constructed once per page with its collaborators
//! and shared by reference; nothing here touches the DOM.

pub mod banlist;
pub mod clock;
pub mod config;
pub mod image;
pub mod popup;

pub use banlist::{BanlistReport, ImpactLevel, Partition, ReportKind, ReportOptions};
pub use clock::{Clock, ManualClock};
pub use config::{ConfigUpdate, LookupConfig};
pub use image::{ImageFallback, ImageStep, Placeholder};
pub use popup::{Placement, Popup, PopupContent, PopupState, PopupTransition, Size};

use an_api_types::{BanlistFormat, BanlistMap, CardRecord};
use an_card_client::{CardDatabase, banlist_map_from_cards};
use an_storage::{KeyValueStore, TtlCache};
use futures::future::join_all;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("card not found: {0}")]
    NotFound(String),
    #[error("card lookup for {name} failed: {reason}")]
    Transport { name: String, reason: String },
}

impl LookupError {
    pub fn card_name(&self) -> &str {
        match self {
            Self::NotFound(name) => name,
            Self::Transport { name, .. } => name,
        }
    }
}

pub struct CardLookup<D> {
    db: D,
    clock: Rc<dyn Clock>,
    store: Option<Rc<dyn KeyValueStore>>,
    config: RefCell<LookupConfig>,
    cards: RefCell<HashMap<String, CardRecord>>,
    banlist: RefCell<Option<(BanlistFormat, BanlistMap)>>,
    popup: RefCell<Popup>,
}

impl<D: CardDatabase> CardLookup<D> {
    pub fn new(db: D, clock: Rc<dyn Clock>, config: LookupConfig) -> Self {
        let popup = Popup::new(config.hide_guard_ms);
        Self {
            db,
            clock,
            store: None,
            config: RefCell::new(config),
            cards: RefCell::new(HashMap::new()),
            banlist: RefCell::new(None),
            popup: RefCell::new(popup),
        }
    }

    /// Persist banlist snapshots in `store`, honouring the configured TTL.
    pub fn with_store(mut self, store: Rc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn config(&self) -> LookupConfig {
        self.config.borrow().clone()
    }

    pub fn configure(&self, update: ConfigUpdate) {
        let mut config = self.config.borrow_mut();
        config.apply(update);
        self.popup.borrow_mut().set_hide_guard(config.hide_guard_ms);
        debug!(image_base_url = %config.image_base_url, "lookup configuration updated");
    }

    pub fn get_cached(&self, name: &str) -> Option<CardRecord> {
        self.cards.borrow().get(name).cloned()
    }

    /// Cached record, or one lookup against the card database.
    pub async fn load_one(&self, name: &str) -> Result<CardRecord, LookupError> {
        if let Some(card) = self.get_cached(name) {
            return Ok(card);
        }

        let found = self
            .db
            .card_by_name(name)
            .await
            .map_err(|err| LookupError::Transport {
                name: name.to_owned(),
                reason: format!("{err:#}"),
            })?;
        let Some(api_card) = found else {
            return Err(LookupError::NotFound(name.to_owned()));
        };

        let image_url = {
            let config = self.config.borrow();
            let extension = config.image_extensions.first().map(String::as_str).unwrap_or(".png");
            image::image_url(&config, api_card.id, extension)
        };
        let card = CardRecord::from_api(&api_card, image_url);
        self.cards.borrow_mut().insert(name.to_owned(), card.clone());
        Ok(card)
    }

    /// One independent lookup per entry. Results come back in input order,
    /// tagged with the caller's container key.
    pub async fn load_many<K>(
        &self,
        requests: impl IntoIterator<Item = (K, String)>,
    ) -> Vec<(K, Result<CardRecord, LookupError>)> {
        let lookups = requests.into_iter().map(|(key, name)| async move {
            let result = self.load_one(&name).await;
            (key, result)
        });
        join_all(lookups).await
    }

    /// Warm the cache. Failures are logged and skipped.
    pub async fn preload(&self, names: &[String]) -> usize {
        let results = join_all(names.iter().map(|name| self.load_one(name))).await;
        let mut loaded = 0;
        for result in results {
            match result {
                Ok(_) => loaded += 1,
                Err(err) => warn!(card = err.card_name(), error = %err, "failed to preload card"),
            }
        }
        info!(requested = names.len(), loaded, "preloaded cards");
        loaded
    }

    pub fn clear_cache(&self) {
        self.cards.borrow_mut().clear();
        self.banlist.borrow_mut().take();
        if let Some(cache) = self.banlist_cache() {
            if let Err(err) = cache.clear() {
                warn!(error = %err, "failed to clear stored banlist");
            }
        }
        info!("card cache and banlist cache cleared");
    }

    /// Name to restriction map for the configured format. A failed fetch
    /// yields an empty map and is not cached.
    pub async fn banlist_map(&self) -> BanlistMap {
        let format = self.config.borrow().banlist_format;
        if let Some((cached, map)) = self.banlist.borrow().as_ref() {
            if *cached == format {
                return map.clone();
            }
        }

        let now = self.clock.now_ms();
        if let Some(cache) = self.banlist_cache() {
            match cache.get_fresh::<BanlistMap>(now) {
                Ok(Some(map)) => {
                    debug!(entries = map.len(), "using stored banlist");
                    *self.banlist.borrow_mut() = Some((format, map.clone()));
                    return map;
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "stored banlist unreadable"),
            }
        }

        let map = match self.db.banlist(format).await {
            Ok(cards) => banlist_map_from_cards(&cards, format),
            Err(err) => {
                warn!(format = format.as_query(), error = %err, "banlist fetch failed, treating all cards as unrestricted");
                return BanlistMap::new();
            }
        };

        info!(format = format.as_query(), restricted = map.len(), "banlist loaded");
        if let Some(cache) = self.banlist_cache() {
            if let Err(err) = cache.put(&map, now) {
                warn!(error = %err, "failed to store banlist");
            }
        }
        *self.banlist.borrow_mut() = Some((format, map.clone()));
        map
    }

    pub async fn classify_banlist(&self, primary: &[String], related: &[String]) -> BanlistReport {
        let map = self.banlist_map().await;
        BanlistReport::classify(primary, related, &map)
    }

    /// Every name, primary and related, in a single partition.
    pub async fn check_status(&self, names: &[String], related: &[String]) -> Partition {
        let map = self.banlist_map().await;
        Partition::of(names.iter().chain(related).map(String::as_str), &map)
    }

    /// Click on a card container. A card that is not cached yet cannot be
    /// shown; the click then only closes whatever is open.
    pub fn show_popup(&self, name: &str) -> PopupTransition {
        let now = self.clock.now_ms();
        let mut popup = self.popup.borrow_mut();
        let open = popup.current() == Some(name);
        if !open && !self.cards.borrow().contains_key(name) {
            return popup.dismiss(now);
        }
        popup.toggle(name, now)
    }

    pub fn dismiss_popup(&self) -> PopupTransition {
        let now = self.clock.now_ms();
        self.popup.borrow_mut().dismiss(now)
    }

    pub fn popup_state(&self) -> PopupState {
        self.popup.borrow().state().clone()
    }

    pub fn popup_content(&self, name: &str) -> Option<PopupContent> {
        self.cards.borrow().get(name).map(PopupContent::for_card)
    }

    pub fn place_popup(&self, pointer_x: f64, pointer_y: f64, popup: Size, viewport: Size) -> Placement {
        let config = self.config.borrow();
        popup::place_popup(
            pointer_x,
            pointer_y,
            popup,
            viewport,
            config.popup_cushion_px,
            config.narrow_breakpoint_px,
        )
    }

    fn banlist_cache(&self) -> Option<TtlCache<&dyn KeyValueStore>> {
        let store = self.store.as_deref()?;
        let config = self.config.borrow();
        let key = format!("banlist-{}", config.banlist_format.as_query());
        Some(TtlCache::new(store, key, config.banlist_ttl_ms))
    }
}
