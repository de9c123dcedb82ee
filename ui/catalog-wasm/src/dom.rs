//! DOM element bindings.
//!
//! All catalog page elements are resolved once at startup in
//! [`Elements::bind`]; nothing else looks elements up by id.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

// ── Helpers ──

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(doc) = document() else {
        return Vec::new();
    };
    let Ok(nl) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()?.create_element(tag)
}

/// Element with a class attribute and optional text.
pub fn create_with(tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
    let el = create_element(tag)?;
    el.set_class_name(class);
    if text.is_some() {
        el.set_text_content(text);
    }
    Ok(el)
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}

pub fn scroll_y() -> f64 {
    window()
        .and_then(|w| w.scroll_y())
        .unwrap_or_default()
}

// ── Elements struct ──

/// Catalog page elements. Clone-friendly: every field is a JS handle.
#[derive(Clone)]
pub struct Elements {
    pub grid: Element,
    pub load_more_container: Element,
    pub load_more_btn: HtmlButtonElement,
    pub loading_indicator: Element,
    pub counter: Element,

    pub search_input: HtmlInputElement,
    pub sort_select: HtmlSelectElement,
    pub category_select: HtmlSelectElement,

    pub alphabet_buttons: Vec<Element>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id)))?
    };
}

impl Elements {
    /// Present only on the catalog index page.
    pub fn on_page() -> bool {
        by_id("archetype-grid").is_some()
    }

    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            grid: get_el!("archetype-grid"),
            load_more_container: get_el!("load-more-container"),
            load_more_btn: get_typed!(HtmlButtonElement, "load-more-btn"),
            loading_indicator: get_el!("loading-indicator"),
            counter: get_el!("archetype-counter"),

            search_input: get_typed!(HtmlInputElement, "search-input"),
            sort_select: get_typed!(HtmlSelectElement, "sort-by"),
            category_select: get_typed!(HtmlSelectElement, "category-filter"),

            alphabet_buttons: query_all(".alphabet-btn"),
        })
    }

    pub fn show_loading(&self) {
        remove_class(&self.loading_indicator, "hidden");
    }

    pub fn hide_loading(&self) {
        add_class(&self.loading_indicator, "hidden");
    }

    /// Full-page error state; the only fatal condition on the page.
    pub fn show_error(&self, message: &str) -> Result<(), JsValue> {
        self.grid.set_inner_html("");
        let p = create_with("p", "text-center text-xl col-span-full text-red-400", Some(message))?;
        self.grid.append_child(&p)?;
        remove_class(&self.grid, "hidden");
        add_class(&self.load_more_container, "hidden");
        self.hide_loading();
        Ok(())
    }
}

// ── Events ──

/// Attach a listener for the lifetime of the page.
pub fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}
