use an_api_types::{ApiCard, BanlistFormat, BanlistMap, CardSetInfo};
use anyhow::Result;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// The external card database.
///
/// Futures are not `Send`: the browser implementation runs on the page's
/// single thread.
#[async_trait(?Send)]
pub trait CardDatabase {
    /// Exact-name lookup. `Ok(None)` when the database has no such card.
    async fn card_by_name(&self, name: &str) -> Result<Option<ApiCard>>;
    /// Every card restricted in `format`, with its `banlist_info`.
    async fn banlist(&self, format: BanlistFormat) -> Result<Vec<ApiCard>>;
    async fn card_sets(&self) -> Result<Vec<CardSetInfo>>;
    async fn all_cards(&self) -> Result<Vec<ApiCard>>;
}

#[async_trait(?Send)]
impl<T: CardDatabase + ?Sized> CardDatabase for Rc<T> {
    async fn card_by_name(&self, name: &str) -> Result<Option<ApiCard>> {
        (**self).card_by_name(name).await
    }

    async fn banlist(&self, format: BanlistFormat) -> Result<Vec<ApiCard>> {
        (**self).banlist(format).await
    }

    async fn card_sets(&self) -> Result<Vec<CardSetInfo>> {
        (**self).card_sets().await
    }

    async fn all_cards(&self) -> Result<Vec<ApiCard>> {
        (**self).all_cards().await
    }
}

/// Name to restriction map for `format`. Cards with no status in that format
/// are left out.
pub fn banlist_map_from_cards(cards: &[ApiCard], format: BanlistFormat) -> BanlistMap {
    let map: BanlistMap = cards
        .iter()
        .filter_map(|card| Some((card.name.clone(), card.ban_status(format)?)))
        .collect();
    debug!(format = format.as_query(), entries = map.len(), "built banlist map");
    map
}

/// Fixture database that answers from memory and counts calls.
#[derive(Default)]
pub struct InMemoryCardDatabase {
    cards: Vec<ApiCard>,
    sets: Vec<CardSetInfo>,
    name_lookups: RefCell<Vec<String>>,
    banlist_calls: Cell<usize>,
    fail_banlist: Cell<bool>,
}

impl InMemoryCardDatabase {
    pub fn new(cards: Vec<ApiCard>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    pub fn with_sets(mut self, sets: Vec<CardSetInfo>) -> Self {
        self.sets = sets;
        self
    }

    /// Makes subsequent banlist requests fail with a transport error.
    pub fn fail_banlist(&self, fail: bool) {
        self.fail_banlist.set(fail);
    }

    pub fn name_lookups(&self) -> Vec<String> {
        self.name_lookups.borrow().clone()
    }

    pub fn lookups_for(&self, name: &str) -> usize {
        self.name_lookups.borrow().iter().filter(|n| *n == name).count()
    }

    pub fn banlist_calls(&self) -> usize {
        self.banlist_calls.get()
    }
}

#[async_trait(?Send)]
impl CardDatabase for InMemoryCardDatabase {
    async fn card_by_name(&self, name: &str) -> Result<Option<ApiCard>> {
        self.name_lookups.borrow_mut().push(name.to_owned());
        Ok(self.cards.iter().find(|card| card.name == name).cloned())
    }

    async fn banlist(&self, format: BanlistFormat) -> Result<Vec<ApiCard>> {
        self.banlist_calls.set(self.banlist_calls.get() + 1);
        if self.fail_banlist.get() {
            anyhow::bail!("banlist {} unavailable", format.as_query());
        }
        Ok(self
            .cards
            .iter()
            .filter(|card| card.ban_status(format).is_some())
            .cloned()
            .collect())
    }

    async fn card_sets(&self) -> Result<Vec<CardSetInfo>> {
        Ok(self.sets.clone())
    }

    async fn all_cards(&self) -> Result<Vec<ApiCard>> {
        Ok(self.cards.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use an_api_types::{BanStatus, BanlistInfo};

    fn banned(name: &str, tcg: &str, ocg: Option<&str>) -> ApiCard {
        ApiCard {
            name: name.to_owned(),
            banlist_info: Some(BanlistInfo {
                ban_tcg: Some(tcg.to_owned()),
                ban_ocg: ocg.map(str::to_owned),
                ban_goat: None,
            }),
            ..ApiCard::default()
        }
    }

    #[tokio::test]
    async fn banlist_map_uses_requested_format() -> Result<()> {
        let db = InMemoryCardDatabase::new(vec![
            banned("Pot of Greed", "Banned", Some("Forbidden")),
            banned("Ash Blossom & Joyous Spring", "Semi-Limited", None),
            ApiCard {
                name: "Dark Magician".into(),
                ..ApiCard::default()
            },
        ]);

        let tcg = banlist_map_from_cards(&db.banlist(BanlistFormat::Tcg).await?, BanlistFormat::Tcg);
        assert_eq!(tcg.len(), 2);
        assert_eq!(tcg["Pot of Greed"], BanStatus::Forbidden);
        assert_eq!(tcg["Ash Blossom & Joyous Spring"], BanStatus::SemiLimited);

        let ocg = banlist_map_from_cards(&db.banlist(BanlistFormat::Ocg).await?, BanlistFormat::Ocg);
        assert_eq!(ocg.len(), 1);
        assert_eq!(db.banlist_calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn fixture_records_lookups_and_failures() -> Result<()> {
        let db = Rc::new(InMemoryCardDatabase::new(vec![ApiCard {
            id: 46986414,
            name: "Dark Magician".into(),
            ..ApiCard::default()
        }]));
        let shared: Rc<dyn CardDatabase> = db.clone();

        assert_eq!(shared.card_by_name("Dark Magician").await?.map(|c| c.id), Some(46986414));
        assert!(shared.card_by_name("Dark Magician Girl").await?.is_none());
        assert_eq!(db.lookups_for("Dark Magician"), 1);

        db.fail_banlist(true);
        assert!(shared.banlist(BanlistFormat::Tcg).await.is_err());
        Ok(())
    }
}
