//! Catalog browser controller.
//!
//! Owns the catalog store, the filter state, the derived view and the pager.
//! Every filter mutation recomputes the view and hands back a full
//! replacement batch; load-more hands back an append batch.

use crate::enrich::{self, EnrichSummary};
use crate::filter::{self, CategoryFilter, FilterState, LetterFilter, SortKey};
use crate::pager::{Page, Pager};
use crate::render::DisplayUnit;
use an_api_types::{ArchetypeDates, ArchetypeRecord};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBatch {
    Replace { units: Vec<DisplayUnit>, has_more: bool },
    Append { units: Vec<DisplayUnit>, has_more: bool },
    /// Nothing matches the current filters.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub shown: usize,
    pub matching: usize,
    pub total: usize,
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shown >= self.matching {
            write!(f, "Found {} of {} archetypes", self.matching, self.total)
        } else {
            write!(
                f,
                "Showing {} of {} archetypes ({} total)",
                self.shown, self.matching, self.total
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    records: Vec<ArchetypeRecord>,
    state: FilterState,
    view: Vec<usize>,
    pager: Pager,
    letters: BTreeSet<char>,
}

impl CatalogBrowser {
    pub fn new(records: Vec<ArchetypeRecord>, page_size: usize) -> Self {
        let letters = filter::available_letters(&records);
        let mut browser = Self {
            records,
            state: FilterState::default(),
            view: Vec::new(),
            pager: Pager::new(page_size),
            letters,
        };
        browser.recompute();
        browser
    }

    pub fn records(&self) -> &[ArchetypeRecord] {
        &self.records
    }

    pub fn record(&self, name: &str) -> Option<&ArchetypeRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn view(&self) -> impl Iterator<Item = &ArchetypeRecord> {
        self.view.iter().map(|idx| &self.records[*idx])
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn is_letter_available(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    pub fn available_letters(&self) -> &BTreeSet<char> {
        &self.letters
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.view.len())
    }

    pub fn counter(&self) -> Counter {
        Counter {
            shown: self.pager.shown(self.view.len()),
            matching: self.view.len(),
            total: self.records.len(),
        }
    }

    /// Apply persisted search text and letter before the first render.
    /// Search wins when both are set.
    pub fn restore(&mut self, search: Option<String>, letter: Option<LetterFilter>) {
        if let Some(letter) = letter {
            self.state.letter = letter;
        }
        if let Some(search) = search {
            self.state.search_query = search;
        }
        if !self.state.search_query.trim().is_empty() {
            self.state.letter = LetterFilter::All;
        }
        self.recompute();
    }

    /// Search text and a specific letter are mutually exclusive; non-empty
    /// search resets the letter to `all`.
    pub fn set_search(&mut self, query: &str) -> RenderBatch {
        self.state.search_query = query.to_owned();
        if !query.trim().is_empty() {
            self.state.letter = LetterFilter::All;
        }
        self.refresh()
    }

    pub fn set_letter(&mut self, letter: LetterFilter) -> RenderBatch {
        self.state.letter = letter;
        if letter != LetterFilter::All {
            self.state.search_query.clear();
        }
        self.refresh()
    }

    pub fn set_category(&mut self, category: CategoryFilter) -> RenderBatch {
        self.state.category = category;
        self.refresh()
    }

    pub fn set_sort(&mut self, sort: SortKey) -> RenderBatch {
        self.state.sort = sort;
        self.refresh()
    }

    /// Merge enrichment results; existing dates are kept.
    pub fn apply_dates(&mut self, dates: &HashMap<String, ArchetypeDates>) -> EnrichSummary {
        let summary = enrich::apply_dates(&mut self.records, dates);
        self.recompute();
        summary
    }

    /// Recompute the view and replace the materialized output with page one.
    pub fn refresh(&mut self) -> RenderBatch {
        self.recompute();
        let first = self.pager.reset(self.view.len());
        if first.range.is_empty() {
            return RenderBatch::Empty;
        }
        RenderBatch::Replace {
            units: self.units(&first),
            has_more: first.has_more,
        }
    }

    /// Starts a load-more. Returns `false` while another one is pending or
    /// when the view is exhausted.
    pub fn begin_load_more(&mut self) -> bool {
        self.pager.begin_advance(self.view.len())
    }

    pub fn complete_load_more(&mut self) -> Option<RenderBatch> {
        let next = self.pager.finish_advance(self.view.len())?;
        Some(RenderBatch::Append {
            units: self.units(&next),
            has_more: next.has_more,
        })
    }

    pub fn load_more(&mut self) -> Option<RenderBatch> {
        if !self.begin_load_more() {
            return None;
        }
        self.complete_load_more()
    }

    fn recompute(&mut self) {
        self.view = filter::derive_view(&self.records, &self.state);
    }

    fn units(&self, page: &Page) -> Vec<DisplayUnit> {
        page.range
            .clone()
            .map(|pos| DisplayUnit::build(&self.records[self.view[pos]], pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(size: usize) -> Vec<ArchetypeRecord> {
        (0..size)
            .map(|i| {
                let name = format!("{}{:03}", (b'a' + (i % 5) as u8) as char, i);
                ArchetypeRecord::new(&name, "", &format!("{name}.html"))
            })
            .collect()
    }

    fn keys(batch: &RenderBatch) -> Vec<String> {
        match batch {
            RenderBatch::Replace { units, .. } | RenderBatch::Append { units, .. } => {
                units.iter().map(|u| u.key.clone()).collect()
            }
            RenderBatch::Empty => Vec::new(),
        }
    }

    #[test]
    fn pages_concatenate_to_the_full_view() {
        let mut browser = CatalogBrowser::new(catalog(100), 24);
        let mut shown = keys(&browser.refresh());
        let mut pages = 1;
        while let Some(batch) = browser.load_more() {
            assert!(matches!(batch, RenderBatch::Append { .. }));
            shown.extend(keys(&batch));
            pages += 1;
        }
        assert_eq!(pages, 5);
        assert!(!browser.has_more());

        let expected: Vec<String> = browser.view().map(|r| r.name.clone()).collect();
        assert_eq!(shown, expected);
        assert_eq!(shown.len(), 100);
    }

    #[test]
    fn search_resets_an_active_letter() {
        let mut browser = CatalogBrowser::new(catalog(20), 24);
        browser.set_letter(LetterFilter::letter('d'));
        assert_eq!(browser.state().letter, LetterFilter::Letter('d'));

        browser.set_search("0");
        assert_eq!(browser.state().letter, LetterFilter::All);
        assert_eq!(browser.state().search_query, "0");
    }

    #[test]
    fn blank_search_keeps_the_letter() {
        let mut browser = CatalogBrowser::new(catalog(20), 24);
        browser.set_letter(LetterFilter::letter('b'));
        browser.set_search("   ");
        assert_eq!(browser.state().letter, LetterFilter::Letter('b'));
    }

    #[test]
    fn selecting_a_letter_clears_search() {
        let mut browser = CatalogBrowser::new(catalog(20), 24);
        browser.set_search("a0");
        let batch = browser.set_letter(LetterFilter::letter('c'));
        assert!(browser.state().search_query.is_empty());
        assert!(keys(&batch).iter().all(|k| k.starts_with('c')));
    }

    #[test]
    fn filter_change_replaces_from_page_one() {
        let mut browser = CatalogBrowser::new(catalog(60), 10);
        browser.refresh();
        browser.load_more();
        browser.load_more();
        assert_eq!(browser.counter().shown, 30);

        let batch = browser.set_sort(SortKey::Za);
        match batch {
            RenderBatch::Replace { units, has_more } => {
                assert_eq!(units.len(), 10);
                assert_eq!(units[0].position, 0);
                assert!(has_more);
            }
            other => panic!("expected replace, got {other:?}"),
        }
        assert_eq!(browser.counter().shown, 10);
    }

    #[test]
    fn no_matches_yields_empty_batch() {
        let mut browser = CatalogBrowser::new(catalog(10), 24);
        assert_eq!(browser.set_search("zzz"), RenderBatch::Empty);
        assert_eq!(browser.counter().to_string(), "Found 0 of 10 archetypes");
    }

    #[test]
    fn counter_reports_partial_pages() {
        let mut browser = CatalogBrowser::new(catalog(30), 24);
        browser.refresh();
        assert_eq!(browser.counter().to_string(), "Showing 24 of 30 archetypes (30 total)");
        browser.load_more();
        assert_eq!(browser.counter().to_string(), "Found 30 of 30 archetypes");
    }

    #[test]
    fn restore_applies_search_precedence() {
        let mut browser = CatalogBrowser::new(catalog(20), 24);
        browser.restore(Some("a".into()), Some(LetterFilter::letter('e')));
        assert_eq!(browser.state().letter, LetterFilter::All);

        let mut browser = CatalogBrowser::new(catalog(20), 24);
        browser.restore(Some(String::new()), Some(LetterFilter::letter('e')));
        assert_eq!(browser.state().letter, LetterFilter::Letter('e'));
        assert!(browser.view().all(|r| r.name.starts_with('e')));
    }

    #[test]
    fn category_follows_enrichment() {
        let mut browser = CatalogBrowser::new(catalog(5), 24);
        let dates: HashMap<String, ArchetypeDates> = [(
            "a000".to_owned(),
            ArchetypeDates {
                earliest: "2002-03-08".into(),
                latest: "2020-01-01".into(),
                card_count: 3,
            },
        )]
        .into_iter()
        .collect();
        browser.apply_dates(&dates);

        browser.set_category(CategoryFilter::Archetypes);
        let names: Vec<&str> = browser.view().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a000"]);

        browser.set_category(CategoryFilter::Series);
        assert_eq!(browser.view_len(), 4);
    }

    #[test]
    fn letters_reflect_the_full_catalog() {
        let mut browser = CatalogBrowser::new(catalog(10), 24);
        browser.set_search("a");
        assert!(browser.is_letter_available('e'));
        assert!(!browser.is_letter_available('z'));
    }
}
