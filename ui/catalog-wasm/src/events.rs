//! Event binding for the catalog page.
//!
//! Every handler funnels user input into the [`CatalogBrowser`] and paints
//! the batch it returns.
//!
//! [`CatalogBrowser`]: an_catalog::CatalogBrowser

use crate::dom::{self, listen};
use crate::grid;
use crate::state::Ctx;
use an_catalog::{CategoryFilter, LetterFilter, RenderBatch, SortKey};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub fn paint(ctx: &Ctx, batch: RenderBatch) {
    if let Err(err) = grid::apply_batch(ctx, batch) {
        gloo_console::error!(format!("failed to render archetypes: {err:?}"));
    }
}

/// Bind all catalog listeners. Call once after the first render.
pub fn bind_events(ctx: &Ctx) -> Result<(), JsValue> {
    let els = &ctx.els;

    // ── Search ──
    {
        let ctx2 = ctx.clone();
        listen(&els.search_input, "keyup", move |_| {
            let ctx3 = ctx2.clone();
            ctx2.search_debounce.schedule(move || on_search(&ctx3));
        })?;
    }

    // ── Sort / category ──
    {
        let ctx2 = ctx.clone();
        listen(&els.sort_select, "change", move |_| {
            let value = ctx2.els.sort_select.value();
            match value.parse::<SortKey>() {
                Ok(sort) => {
                    let batch = ctx2.browser.borrow_mut().set_sort(sort);
                    paint(&ctx2, batch);
                }
                Err(err) => gloo_console::warn!(err.to_string()),
            }
        })?;
    }
    {
        let ctx2 = ctx.clone();
        listen(&els.category_select, "change", move |_| {
            let value = ctx2.els.category_select.value();
            match value.parse::<CategoryFilter>() {
                Ok(category) => {
                    let batch = ctx2.browser.borrow_mut().set_category(category);
                    paint(&ctx2, batch);
                }
                Err(err) => gloo_console::warn!(err.to_string()),
            }
        })?;
    }

    // ── Paging ──
    {
        let ctx2 = ctx.clone();
        listen(&els.load_more_btn, "click", move |_| grid::load_more(&ctx2))?;
    }
    grid::install_infinite_scroll(ctx)?;

    // ── Alphabet ──
    for btn in &els.alphabet_buttons {
        let Some(raw) = btn.get_attribute("data-letter") else {
            continue;
        };
        let letter = match raw.parse::<LetterFilter>() {
            Ok(letter) => letter,
            Err(err) => {
                gloo_console::warn!(err.to_string());
                continue;
            }
        };
        let ctx2 = ctx.clone();
        listen(btn, "click", move |_| on_letter(&ctx2, letter))?;
    }

    // ── Leaving for an archetype page ──
    {
        let ctx2 = ctx.clone();
        let doc = dom::document()?;
        listen(&doc, "click", move |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
                return;
            };
            if let Ok(Some(_)) = target.closest(r#"a[href$=".html"]"#) {
                ctx2.save_position();
            }
        })?;
    }

    Ok(())
}

fn on_search(ctx: &Ctx) {
    let query = ctx.els.search_input.value();
    ctx.bridge.save_search(&query);

    let had_letter = ctx.current_letter() != LetterFilter::All;
    let batch = ctx.browser.borrow_mut().set_search(&query);
    if had_letter && ctx.current_letter() == LetterFilter::All {
        ctx.bridge.save_letter(&LetterFilter::All.to_string());
    }

    paint(ctx, batch);
    grid::update_letter_buttons(ctx);
}

pub fn on_letter(ctx: &Ctx, letter: LetterFilter) {
    ctx.bridge.save_letter(&letter.to_string());
    let batch = ctx.browser.borrow_mut().set_letter(letter);
    if letter != LetterFilter::All {
        ctx.els.search_input.set_value("");
        ctx.bridge.save_search("");
    }
    paint(ctx, batch);
    grid::update_letter_buttons(ctx);
}
