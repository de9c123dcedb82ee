//! Release-date enrichment.
//!
//! An archetype's first date is the earliest original release among its
//! cards; its latest date is the most recent card's original release. A
//! card's original release is the earliest TCG set date that is not after
//! `today`.

use an_api_types::{ApiCard, ArchetypeDates, ArchetypeRecord, CardSetInfo};
use std::collections::HashMap;
use tracing::debug;

pub const DATES_CACHE_KEY: &str = "archetype-dates-cache";

/// Card databases spell some archetypes with hyphens the catalog omits.
pub fn normalize_archetype_name(name: &str) -> String {
    name.replace('-', "")
}

pub fn compute_archetype_dates<'a>(
    names: impl IntoIterator<Item = &'a str>,
    cards: &[ApiCard],
    sets: &[CardSetInfo],
    today: &str,
) -> HashMap<String, ArchetypeDates> {
    let by_normalized: HashMap<String, &str> = names
        .into_iter()
        .map(|name| (normalize_archetype_name(name), name))
        .collect();

    let release_dates: HashMap<&str, &str> = sets
        .iter()
        .filter_map(|set| Some((set.set_name.as_str(), set.tcg_date.as_deref()?)))
        .filter(|(_, date)| !date.is_empty())
        .collect();

    let mut card_dates: HashMap<&str, Vec<&str>> = HashMap::new();
    for card in cards {
        let Some(archetype) = card.archetype.as_deref() else {
            continue;
        };
        let Some(name) = by_normalized.get(&normalize_archetype_name(archetype)) else {
            continue;
        };
        let original_release = card
            .card_sets
            .iter()
            .filter_map(|set| release_dates.get(set.set_name.as_str()).copied())
            .filter(|date| *date <= today)
            .min();
        if let Some(date) = original_release {
            card_dates.entry(*name).or_default().push(date);
        }
    }

    card_dates
        .into_iter()
        .filter_map(|(name, dates)| {
            let earliest = dates.iter().min()?;
            let latest = dates.iter().max()?;
            Some((
                name.to_owned(),
                ArchetypeDates {
                    earliest: (*earliest).to_owned(),
                    latest: (*latest).to_owned(),
                    card_count: dates.len() as u32,
                },
            ))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub enriched: usize,
    pub preset: usize,
    pub unmatched: usize,
}

/// Merge computed dates into the catalog. Records that already carry a first
/// date are left untouched and count as series.
pub fn apply_dates(
    records: &mut [ArchetypeRecord],
    dates: &HashMap<String, ArchetypeDates>,
) -> EnrichSummary {
    let mut summary = EnrichSummary::default();
    for record in records.iter_mut() {
        if record.first_release_date.is_some() {
            record.from_api = false;
            summary.preset += 1;
            continue;
        }
        match dates.get(&record.name) {
            Some(found) => {
                record.first_release_date = Some(found.earliest.clone());
                record.latest_release_date = Some(found.latest.clone());
                record.total_cards = Some(found.card_count);
                record.from_api = true;
                summary.enriched += 1;
            }
            None => {
                record.latest_release_date = None;
                record.from_api = false;
                summary.unmatched += 1;
            }
        }
    }
    debug!(
        enriched = summary.enriched,
        preset = summary.preset,
        unmatched = summary.unmatched,
        "applied archetype dates"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use an_api_types::CardSetRef;

    fn set(name: &str, date: &str) -> CardSetInfo {
        CardSetInfo {
            set_name: name.to_owned(),
            set_code: None,
            tcg_date: Some(date.to_owned()),
        }
    }

    fn card(id: u64, archetype: &str, sets: &[&str]) -> ApiCard {
        ApiCard {
            id,
            name: format!("card-{id}"),
            archetype: Some(archetype.to_owned()),
            card_sets: sets
                .iter()
                .map(|s| CardSetRef {
                    set_name: (*s).to_owned(),
                    set_code: None,
                })
                .collect(),
            ..ApiCard::default()
        }
    }

    #[test]
    fn dates_follow_original_card_releases() {
        let sets = vec![
            set("Legend of Blue Eyes", "2002-03-08"),
            set("Dark Beginning", "2004-09-01"),
            set("Legendary Duelists", "2019-01-01"),
            set("Future Pack", "2999-01-01"),
        ];
        let cards = vec![
            card(1, "Dark Magician", &["Legend of Blue Eyes", "Legendary Duelists"]),
            card(2, "Dark Magician", &["Legendary Duelists"]),
            card(3, "Dark Magician", &["Future Pack"]),
            card(4, "Unrelated", &["Dark Beginning"]),
        ];

        let dates = compute_archetype_dates(["Dark Magician"], &cards, &sets, "2024-06-01");
        let dm = &dates["Dark Magician"];
        assert_eq!(dm.earliest, "2002-03-08");
        assert_eq!(dm.latest, "2019-01-01");
        assert_eq!(dm.card_count, 2);
        assert!(!dates.contains_key("Unrelated"));
    }

    #[test]
    fn hyphenated_archetypes_match_catalog_names() {
        let sets = vec![set("Duelist Pack", "2010-05-05")];
        let cards = vec![card(9, "D-D", &["Duelist Pack"])];
        let dates = compute_archetype_dates(["DD"], &cards, &sets, "2024-01-01");
        assert_eq!(dates["DD"].earliest, "2010-05-05");
    }

    #[test]
    fn apply_never_overwrites_existing_dates() {
        let mut preset = ArchetypeRecord::new("Earthbound", "", "e.html");
        preset.first_release_date = Some("2009-03-03".into());
        let fresh = ArchetypeRecord::new("Eldlich", "", "el.html");
        let missing = ArchetypeRecord::new("D.D.", "", "dd.html");
        let mut records = vec![preset, fresh, missing];

        let computed: HashMap<String, ArchetypeDates> = [
            ("Earthbound", "2001-01-01", "2001-01-01"),
            ("Eldlich", "2019-11-08", "2022-08-04"),
        ]
        .into_iter()
        .map(|(name, earliest, latest)| {
            (
                name.to_owned(),
                ArchetypeDates {
                    earliest: earliest.to_owned(),
                    latest: latest.to_owned(),
                    card_count: 5,
                },
            )
        })
        .collect();

        let summary = apply_dates(&mut records, &computed);
        assert_eq!(
            summary,
            EnrichSummary {
                enriched: 1,
                preset: 1,
                unmatched: 1
            }
        );
        assert_eq!(records[0].first_release_date.as_deref(), Some("2009-03-03"));
        assert!(!records[0].from_api);
        assert_eq!(records[1].latest_release_date.as_deref(), Some("2022-08-04"));
        assert_eq!(records[1].total_cards, Some(5));
        assert!(records[1].from_api);
        assert!(records[2].first_release_date.is_none());
        assert!(!records[2].from_api);
    }
}
