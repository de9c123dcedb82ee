//! Grid painting: display units, lazy icons, infinite scroll and the
//! load-more button.

use crate::dom::{self, create_with, remove_class, toggle_class};
use crate::state::{Ctx, LOAD_MORE_SETTLE_MS};
use crate::timers;
use an_api_types::IconSource;
use an_catalog::{DisplayUnit, IconReveal, LetterFilter, NearVisible, RenderBatch};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

const EMPTY_MESSAGE: &str = "No archetypes found matching your search.";
const ICON_LOADING_HTML: &str = r#"<div class="icon-loading bg-gray-700 rounded-full w-16 h-16 mx-auto mb-4 flex items-center justify-center"><div class="animate-spin rounded-full h-8 w-8 border-b-2 border-blue-400"></div></div>"#;

// ── Batches ──

pub fn apply_batch(ctx: &Ctx, batch: RenderBatch) -> Result<(), JsValue> {
    let els = &ctx.els;
    match batch {
        RenderBatch::Replace { units, has_more } => {
            clear_grid(ctx);
            append_units(ctx, &units)?;
            set_has_more(ctx, has_more);
        }
        RenderBatch::Append { units, has_more } => {
            append_units(ctx, &units)?;
            set_has_more(ctx, has_more);
        }
        RenderBatch::Empty => {
            clear_grid(ctx);
            let p = create_with("p", "text-center text-xl col-span-full text-gray-400", Some(EMPTY_MESSAGE))?;
            els.grid.append_child(&p)?;
            set_has_more(ctx, false);
        }
    }
    remove_class(&els.grid, "hidden");
    update_counter(ctx);
    Ok(())
}

fn clear_grid(ctx: &Ctx) {
    ctx.els.grid.set_inner_html("");
    if let Some(observer) = ctx.icon_observer.borrow().as_ref() {
        observer.disconnect();
    }
    ctx.icons.borrow_mut().clear();
}

fn set_has_more(ctx: &Ctx, has_more: bool) {
    toggle_class(&ctx.els.load_more_container, "hidden", !has_more);
}

fn append_units(ctx: &Ctx, units: &[DisplayUnit]) -> Result<(), JsValue> {
    let fragment = dom::document()?.create_document_fragment();
    let mut to_observe = Vec::new();
    {
        let browser = ctx.browser.borrow();
        let mut icons = ctx.icons.borrow_mut();
        for unit in units {
            let (card, slot) = build_card(unit)?;
            fragment.append_child(&card)?;
            let scheduled = browser
                .record(&unit.key)
                .is_some_and(|record| icons.register(unit, record));
            if scheduled {
                to_observe.push(slot);
            }
        }
    }
    ctx.els.grid.append_child(&fragment)?;

    if let Some(observer) = ctx.icon_observer.borrow().as_ref() {
        for slot in &to_observe {
            observer.observe(slot);
        }
    }
    Ok(())
}

/// Builds one catalog entry; returns it together with its icon slot.
fn build_card(unit: &DisplayUnit) -> Result<(Element, Element), JsValue> {
    let card = create_with("a", "card p-6 text-center block", None)?;
    card.set_attribute("href", &unit.href)?;
    card.set_attribute("data-index", &unit.position.to_string())?;

    let slot = create_with("div", "card-image", None)?;
    slot.set_attribute("data-archetype-name", &unit.key)?;
    if matches!(unit.icon, an_catalog::IconSlot::Pending) {
        slot.set_inner_html(ICON_LOADING_HTML);
    }
    card.append_child(&slot)?;

    let title = create_with("h2", "text-2xl font-bold text-gray-100 mb-1", Some(&unit.title))?;
    card.append_child(&title)?;
    let category = create_with(
        "div",
        "text-xs text-gray-400 mb-2 uppercase tracking-wide",
        Some(unit.category),
    )?;
    card.append_child(&category)?;
    if let Some(dates) = &unit.dates {
        let el = create_with("div", "text-sm text-gray-500 mb-2", Some(dates))?;
        card.append_child(&el)?;
    }
    let description = create_with("p", "text-gray-400", Some(&unit.description))?;
    card.append_child(&description)?;

    Ok((card, slot))
}

// ── Icons ──

/// Observer that reveals each scheduled icon once, after a short random
/// stagger, when its slot comes near the viewport.
pub fn install_icon_observer(ctx: &Ctx) -> Result<(), JsValue> {
    let near = NearVisible::default();
    let ctx2 = ctx.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let slot = entry.target();
            observer.unobserve(&slot);
            let Some(key) = slot.get_attribute("data-archetype-name") else {
                continue;
            };
            let reveal = {
                let mut rng = ctx2.rng.borrow_mut();
                ctx2.icons.borrow_mut().on_visible(&key, &mut *rng)
            };
            if let Some(reveal) = reveal {
                schedule_reveal(slot, reveal);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&near.root_margin());
    init.set_threshold(&JsValue::from_f64(near.threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    ctx.icon_observer.replace(Some(observer));
    Ok(())
}

fn schedule_reveal(slot: Element, reveal: IconReveal) {
    Timeout::new(reveal.delay_ms, move || {
        if let Err(err) = paint_icon(&slot, &reveal.icon, &reveal.key) {
            gloo_console::warn!(format!("icon for {} failed: {err:?}", reveal.key));
        }
    })
    .forget();
}

fn paint_icon(slot: &Element, icon: &IconSource, name: &str) -> Result<(), JsValue> {
    match icon {
        IconSource::Inline(markup) => slot.set_inner_html(markup),
        IconSource::Lazy { src } => {
            slot.set_inner_html("");
            let img = create_with("img", "w-16 h-16 mx-auto mb-4", None)?;
            img.set_attribute("src", src)?;
            img.set_attribute("alt", name)?;
            img.set_attribute("loading", "lazy")?;
            slot.append_child(&img)?;
        }
    }
    Ok(())
}

// ── Paging ──

/// Loads the next page when the load-more container scrolls into view.
pub fn install_infinite_scroll(ctx: &Ctx) -> Result<(), JsValue> {
    let ctx2 = ctx.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
        let visible = entries.iter().any(|entry| {
            entry
                .dyn_into::<IntersectionObserverEntry>()
                .is_ok_and(|e| e.is_intersecting())
        });
        if visible && !dom::has_class(&ctx2.els.load_more_container, "hidden") {
            load_more(&ctx2);
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(0.5));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    observer.observe(&ctx.els.load_more_container);
    Ok(())
}

/// Appends the next page after a short settle delay. Ignored while a
/// previous load-more is still pending.
pub fn load_more(ctx: &Ctx) {
    if !ctx.browser.borrow_mut().begin_load_more() {
        return;
    }
    let btn = ctx.els.load_more_btn.clone();
    let label = btn.text_content().unwrap_or_default();
    btn.set_text_content(Some("Loading..."));
    btn.set_disabled(true);

    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        timers::sleep(LOAD_MORE_SETTLE_MS).await;
        let batch = ctx.browser.borrow_mut().complete_load_more();
        if let Some(batch) = batch {
            if let Err(err) = apply_batch(&ctx, batch) {
                gloo_console::error!(format!("failed to append archetypes: {err:?}"));
            }
        }
        btn.set_text_content(Some(&label));
        btn.set_disabled(false);
    });
}

// ── Chrome ──

pub fn update_counter(ctx: &Ctx) {
    let counter = ctx.browser.borrow().counter();
    ctx.els.counter.set_text_content(Some(&counter.to_string()));
}

/// Active marker on the current letter; letters with no archetypes are
/// greyed out.
pub fn update_letter_buttons(ctx: &Ctx) {
    let browser = ctx.browser.borrow();
    let current = browser.state().letter;
    for btn in &ctx.els.alphabet_buttons {
        let Some(raw) = btn.get_attribute("data-letter") else {
            continue;
        };
        let Ok(letter) = raw.parse::<LetterFilter>() else {
            continue;
        };
        toggle_class(btn, "active", letter == current);
        match letter {
            LetterFilter::All => remove_class(btn, "disabled"),
            LetterFilter::Letter(c) => toggle_class(btn, "disabled", !browser.is_letter_available(c)),
        }
    }
}
