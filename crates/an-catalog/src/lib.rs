//! Archetype catalog core.
//!
//! Everything here is DOM-free: the browser front-end feeds user input into
//! [`CatalogBrowser`] and paints the [`RenderBatch`]es it hands back.

pub mod browser;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod pager;
pub mod render;

pub use browser::{CatalogBrowser, Counter, RenderBatch};
pub use error::CatalogError;
pub use filter::{CategoryFilter, FilterState, LetterFilter, SortKey};
pub use pager::{DEFAULT_PAGE_SIZE, Page, PageCursor, Pager};
pub use render::{DisplayUnit, IconReveal, IconScheduler, IconSlot, NearVisible};

use an_api_types::ArchetypeRecord;
use std::collections::HashSet;

/// Parse the catalog JSON array delivered by the data source.
pub fn parse_catalog(raw: &str) -> Result<Vec<ArchetypeRecord>, CatalogError> {
    let records: Vec<ArchetypeRecord> = serde_json::from_str(raw)
        .map_err(|err| CatalogError::DataUnavailable(err.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.name.as_str()) {
            return Err(CatalogError::DuplicateName(record.name.clone()));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_catalog_accepts_minimal_records() {
        let raw = r#"[
            {"name": "Dark Magician", "description": "Spellcasters.", "filepath": "Dark Magician Deck Analysis.html"},
            {"name": "Dark World", "description": "Fiends.", "filepath": "Dark World Deck Analysis.html", "firstReleaseDate": "2008-02-14"}
        ]"#;
        let records = parse_catalog(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].first_release_date.as_deref(), Some("2008-02-14"));
    }

    #[test]
    fn parse_catalog_rejects_duplicate_names() {
        let raw = r#"[
            {"name": "D/D", "description": "", "filepath": "a.html"},
            {"name": "D/D", "description": "", "filepath": "b.html"}
        ]"#;
        assert!(matches!(parse_catalog(raw), Err(CatalogError::DuplicateName(name)) if name == "D/D"));
    }

    #[test]
    fn parse_catalog_reports_unusable_payload() {
        assert!(matches!(
            parse_catalog("const archetypes = [];"),
            Err(CatalogError::DataUnavailable(_))
        ));
    }
}
