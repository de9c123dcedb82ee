//! Release-date enrichment in the browser, cached for a day.

use crate::api::GlooCardDatabase;
use crate::state::Ctx;
use crate::storage::BrowserStore;
use crate::timers;
use an_api_types::ArchetypeDates;
use an_card_client::CardDatabase;
use an_catalog::enrich::{DATES_CACHE_KEY, compute_archetype_dates};
use an_storage::{DAY_MS, TtlCache};
use anyhow::Result;
use std::collections::HashMap;

type DateMap = HashMap<String, ArchetypeDates>;

/// `YYYY-MM-DD` for the local calendar day.
fn today() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

async fn fetch_dates(ctx: &Ctx, db: &GlooCardDatabase) -> Result<DateMap> {
    let sets = db.card_sets().await?;
    let cards = db.all_cards().await?;
    let browser = ctx.browser.borrow();
    let names = browser.records().iter().map(|r| r.name.as_str());
    Ok(compute_archetype_dates(names, &cards, &sets, &today()))
}

/// Merges archetype dates into the catalog. Failure leaves every date
/// as it was and is only logged.
pub async fn enrich(ctx: &Ctx) {
    let cache = TtlCache::new(BrowserStore, DATES_CACHE_KEY, DAY_MS);
    let now = timers::now_ms();

    let cached = match cache.get_fresh::<DateMap>(now) {
        Ok(found) => found,
        Err(err) => {
            gloo_console::warn!(format!("ignoring cached archetype dates: {err:#}"));
            None
        }
    };

    let dates = match cached {
        Some(dates) => {
            gloo_console::log!("Using cached archetype dates");
            dates
        }
        None => match fetch_dates(ctx, &GlooCardDatabase::default()).await {
            Ok(dates) => {
                if let Err(err) = cache.put(&dates, now) {
                    gloo_console::warn!(format!("could not cache archetype dates: {err:#}"));
                }
                dates
            }
            Err(err) => {
                gloo_console::error!(format!("Error fetching archetype dates: {err:#}"));
                return;
            }
        },
    };

    let summary = ctx.browser.borrow_mut().apply_dates(&dates);
    gloo_console::log!(format!(
        "archetype dates applied: {} enriched, {} preset, {} unmatched",
        summary.enriched, summary.preset, summary.unmatched
    ));
}
