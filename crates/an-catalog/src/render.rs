//! Display units and deferred icon scheduling.

use an_api_types::{ArchetypeRecord, IconSource};
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSlot {
    /// Loading placeholder until the unit comes near the viewport.
    Pending,
    /// Record has no icon; the slot stays neutral.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    pub position: usize,
    pub key: String,
    pub href: String,
    pub title: String,
    pub category: &'static str,
    pub dates: Option<String>,
    pub description: String,
    pub icon: IconSlot,
}

impl DisplayUnit {
    pub fn build(record: &ArchetypeRecord, position: usize) -> Self {
        Self {
            position,
            key: record.name.clone(),
            href: record.filepath.clone(),
            title: record.name.clone(),
            category: if record.from_api { "Archetype" } else { "Series" },
            dates: date_annotation(
                record.first_release_date.as_deref(),
                record.latest_release_date.as_deref(),
            ),
            description: record.description.clone(),
            icon: if record.icon.is_some() {
                IconSlot::Pending
            } else {
                IconSlot::Empty
            },
        }
    }
}

pub fn date_annotation(first: Option<&str>, latest: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [("Release", first), ("Support", latest)]
        .into_iter()
        .filter_map(|(label, date)| Some(format!("{label}: {}", year_of(date?)?)))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn year_of(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}

/// Proximity condition for revealing icons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearVisible {
    pub root_margin_px: u32,
    pub threshold: f64,
}

impl Default for NearVisible {
    fn default() -> Self {
        Self {
            root_margin_px: 50,
            threshold: 0.1,
        }
    }
}

impl NearVisible {
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconReveal {
    pub key: String,
    pub icon: IconSource,
    pub delay_ms: u32,
}

/// Icons waiting for their unit to come near the viewport. Each entry fires
/// at most once and is forgotten afterwards.
#[derive(Debug, Clone)]
pub struct IconScheduler {
    pending: HashMap<String, IconSource>,
    max_stagger_ms: u32,
}

impl Default for IconScheduler {
    fn default() -> Self {
        Self::new(200)
    }
}

impl IconScheduler {
    pub fn new(max_stagger_ms: u32) -> Self {
        Self {
            pending: HashMap::new(),
            max_stagger_ms,
        }
    }

    pub fn register(&mut self, unit: &DisplayUnit, record: &ArchetypeRecord) -> bool {
        match (&unit.icon, &record.icon) {
            (IconSlot::Pending, Some(icon)) => {
                self.pending.insert(unit.key.clone(), icon.clone());
                true
            }
            _ => false,
        }
    }

    pub fn on_visible<R: Rng>(&mut self, key: &str, rng: &mut R) -> Option<IconReveal> {
        let icon = self.pending.remove(key)?;
        let delay_ms = if self.max_stagger_ms == 0 {
            0
        } else {
            rng.gen_range(0..=self.max_stagger_ms)
        };
        Some(IconReveal {
            key: key.to_owned(),
            icon,
            delay_ms,
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
