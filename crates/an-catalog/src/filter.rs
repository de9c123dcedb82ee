//! Filter/sort engine.
//!
//! A view is a list of indices into the catalog store, so it can never hold a
//! record the store does not.

use crate::error::CatalogError;
use an_api_types::ArchetypeRecord;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Az,
    Za,
    FirstAsc,
    FirstDesc,
    LatestAsc,
    LatestDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Az => "az",
            Self::Za => "za",
            Self::FirstAsc => "firstAsc",
            Self::FirstDesc => "firstDesc",
            Self::LatestAsc => "latestAsc",
            Self::LatestDesc => "latestDesc",
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "az" => Ok(Self::Az),
            "za" => Ok(Self::Za),
            "firstAsc" => Ok(Self::FirstAsc),
            "firstDesc" => Ok(Self::FirstDesc),
            "latestAsc" => Ok(Self::LatestAsc),
            "latestDesc" => Ok(Self::LatestDesc),
            other => Err(CatalogError::InvalidFilter(format!("sort key '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Archetypes,
    Series,
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Archetypes => "archetypes",
            Self::Series => "series",
        }
    }

    fn admits(&self, record: &ArchetypeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Archetypes => record.from_api,
            Self::Series => !record.from_api,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "archetypes" => Ok(Self::Archetypes),
            "series" => Ok(Self::Series),
            other => Err(CatalogError::InvalidFilter(format!("category '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterFilter {
    #[default]
    All,
    Letter(char),
}

impl LetterFilter {
    pub fn letter(c: char) -> Self {
        Self::Letter(c.to_lowercase().next().unwrap_or(c))
    }

    fn admits(&self, record: &ArchetypeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Letter(c) => first_letter(&record.name) == Some(*c),
        }
    }
}

impl fmt::Display for LetterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Letter(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for LetterFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::letter(c)),
            _ => Err(CatalogError::InvalidFilter(format!("letter '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub letter: LetterFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl FilterState {
    pub fn matches(&self, record: &ArchetypeRecord) -> bool {
        let query = self.search_query.to_lowercase();
        record.name.to_lowercase().contains(&query)
            && self.letter.admits(record)
            && self.category.admits(record)
    }
}

/// Indices of the records admitted by `state`, ordered by its sort key.
/// Equal keys keep catalog order.
pub fn derive_view(records: &[ArchetypeRecord], state: &FilterState) -> Vec<usize> {
    let mut view: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| state.matches(record))
        .map(|(idx, _)| idx)
        .collect();

    let by = |a: &usize, b: &usize| compare_records(&records[*a], &records[*b], state.sort);
    view.sort_by(by);
    view
}

pub fn compare_records(a: &ArchetypeRecord, b: &ArchetypeRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Az => locale_cmp(&a.name, &b.name),
        SortKey::Za => locale_cmp(&b.name, &a.name),
        SortKey::FirstAsc => compare_dates(
            a.first_release_date.as_deref(),
            b.first_release_date.as_deref(),
            true,
        ),
        SortKey::FirstDesc => compare_dates(
            a.first_release_date.as_deref(),
            b.first_release_date.as_deref(),
            false,
        ),
        SortKey::LatestAsc => compare_dates(
            a.latest_release_date.as_deref(),
            b.latest_release_date.as_deref(),
            true,
        ),
        SortKey::LatestDesc => compare_dates(
            a.latest_release_date.as_deref(),
            b.latest_release_date.as_deref(),
            false,
        ),
    }
}

/// ISO dates compare as strings. Missing dates go last in both directions.
pub fn compare_dates(a: Option<&str>, b: Option<&str>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if ascending => a.cmp(b),
        (Some(a), Some(b)) => b.cmp(a),
    }
}

/// Case-insensitive name ordering; when names differ only by case the
/// lowercase form sorts first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    folded(a).cmp(&folded(b)).then_with(|| {
        a.chars()
            .zip(b.chars())
            .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

pub fn first_letter(name: &str) -> Option<char> {
    name.chars().next().and_then(|c| c.to_lowercase().next())
}

/// Letters with at least one record in the full catalog.
pub fn available_letters(records: &[ArchetypeRecord]) -> BTreeSet<char> {
    records.iter().filter_map(|r| first_letter(&r.name)).collect()
}
