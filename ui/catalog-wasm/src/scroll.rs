//! Scroll memory: save while browsing, restore on return.

use crate::dom::{self, listen};
use crate::grid;
use crate::state::{Ctx, POPSTATE_DELAY_MS, SCROLL_RESTORE_DELAY_MS};
use crate::timers;
use an_catalog::LetterFilter;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{ScrollBehavior, ScrollToOptions};

pub fn bind_scroll_memory(ctx: &Ctx) -> Result<(), JsValue> {
    let window = dom::window()?;

    {
        let ctx2 = ctx.clone();
        listen(&window, "beforeunload", move |_| {
            ctx2.bridge.save_scroll(dom::scroll_y());
            ctx2.bridge.save_letter(&ctx2.current_letter().to_string());
        })?;
    }
    {
        let ctx2 = ctx.clone();
        listen(&window, "scroll", move |_| {
            let ctx3 = ctx2.clone();
            ctx2.scroll_debounce
                .schedule(move || ctx3.bridge.save_scroll(dom::scroll_y()));
        })?;
    }
    {
        let ctx2 = ctx.clone();
        listen(&window, "popstate", move |_| {
            let ctx3 = ctx2.clone();
            Timeout::new(POPSTATE_DELAY_MS, move || {
                restore_letter(&ctx3);
                restore_scroll(&ctx3);
            })
            .forget();
        })?;
    }
    Ok(())
}

/// Re-applies the saved letter if it differs from the current one.
fn restore_letter(ctx: &Ctx) {
    let letter = ctx.restored_letter().unwrap_or(LetterFilter::All);
    if letter == ctx.current_letter() {
        return;
    }
    let batch = ctx.browser.borrow_mut().set_letter(letter);
    if letter != LetterFilter::All {
        ctx.els.search_input.set_value("");
    }
    crate::events::paint(ctx, batch);
    grid::update_letter_buttons(ctx);
}

/// Smooth-scrolls to the saved offset once layout has settled.
pub fn restore_scroll(ctx: &Ctx) {
    let Some(offset) = ctx.bridge.restore_scroll() else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = timers::next_frame().await {
            gloo_console::warn!(format!("animation frame unavailable: {err:?}"));
        }
        timers::sleep(SCROLL_RESTORE_DELAY_MS).await;
        let Ok(window) = dom::window() else {
            return;
        };
        let opts = ScrollToOptions::new();
        opts.set_top(offset);
        opts.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&opts);
    });
}
