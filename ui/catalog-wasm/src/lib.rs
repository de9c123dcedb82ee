//! Archetype Nexus browser front-end.
//!
//! On the catalog index page this drives the archetype grid; on archetype
//! pages it only exports [`CardLoader`] for the page's own script.

pub mod api;
pub mod banlist_view;
pub mod card_loader;
pub mod dates;
pub mod dom;
pub mod events;
pub mod grid;
pub mod logging;
pub mod scroll;
pub mod state;
pub mod storage;
pub mod timers;

pub use card_loader::CardLoader;

use an_catalog::{CatalogBrowser, DEFAULT_PAGE_SIZE};
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    if !dom::Elements::on_page() {
        return Ok(());
    }
    init().await
}

/// Catalog page startup: data, dates, restored filters, first page, then
/// listeners and the saved scroll offset.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    els.show_loading();

    let records = match api::load_catalog().await {
        Ok(records) => records,
        Err(err) => {
            gloo_console::error!(format!("Error loading archetypes: {err}"));
            return els.show_error("Failed to load archetype data. Please refresh the page.");
        }
    };
    gloo_console::log!(format!("Loaded {} archetypes", records.len()));

    let ctx = state::AppContext::new(els, CatalogBrowser::new(records, DEFAULT_PAGE_SIZE));
    grid::install_icon_observer(&ctx)?;

    dates::enrich(&ctx).await;
    ctx.els.hide_loading();

    // Restore search and letter; search wins when both are saved.
    let search = ctx.bridge.restore_search();
    let letter = ctx.restored_letter();
    ctx.browser.borrow_mut().restore(search, letter);
    let query = ctx.browser.borrow().state().search_query.clone();
    ctx.els.search_input.set_value(&query);

    let batch = ctx.browser.borrow_mut().refresh();
    grid::apply_batch(&ctx, batch)?;
    grid::update_letter_buttons(&ctx);

    events::bind_events(&ctx)?;
    scroll::bind_scroll_memory(&ctx)?;
    scroll::restore_scroll(&ctx);
    Ok(())
}
