//! `CardLoader`: the card lookup widget exported to per-archetype pages.
//!
//! ```js
//! const loader = new CardLoader();
//! await loader.loadCards({ "card-1": "Dark Magician" });
//! await loader.renderBanlistSection("banlist", cards, { archetypeName: "Dark Magician" });
//! ```

use crate::api::GlooCardDatabase;
use crate::banlist_view::{self, escape_html};
use crate::dom::{self, listen};
use crate::storage::BrowserStore;
use crate::timers;
use an_api_types::CardRecord;
use an_card_lookup::{
    CardLookup, Clock, ConfigUpdate, ImageFallback, ImageStep, LookupConfig, LookupError,
    Placeholder, PopupContent, PopupState, PopupTransition, ReportOptions, Size,
};
use gloo_timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Element, HtmlElement, HtmlImageElement, MouseEvent};

const POPUP_ID: &str = "card-popup";
const POPUP_CLASS: &str = "fixed z-50 bg-gray-900 border-2 border-blue-500 text-white p-4 rounded-lg shadow-lg max-w-xs max-h-96 overflow-y-auto opacity-0 transition-opacity duration-200 pointer-events-none";
const FADE_IN_MS: u32 = 10;
const FADE_OUT_MS: u32 = 200;

struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        timers::now_ms()
    }
}

struct Inner {
    lookup: CardLookup<GlooCardDatabase>,
    popup: HtmlElement,
}

type Shared = Rc<Inner>;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_err)
}

#[wasm_bindgen]
pub struct CardLoader {
    inner: Shared,
}

#[wasm_bindgen]
impl CardLoader {
    /// Creates (or adopts) the shared popup element and the document-level
    /// dismiss listener.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CardLoader, JsValue> {
        let lookup = CardLookup::new(
            GlooCardDatabase::default(),
            Rc::new(BrowserClock),
            LookupConfig::default(),
        )
        .with_store(Rc::new(BrowserStore));

        let inner = Rc::new(Inner {
            lookup,
            popup: ensure_popup()?,
        });

        let inner2 = inner.clone();
        let document = dom::document()?;
        listen(&document, "click", move |_| {
            if let PopupTransition::Closed(_) = inner2.lookup.dismiss_popup() {
                fade_out(&inner2);
            }
        })?;

        gloo_console::log!("CardLoader initialized");
        Ok(CardLoader { inner })
    }

    /// Fills `container_id` with the card's image and makes it clickable.
    #[wasm_bindgen(js_name = loadCard)]
    pub fn load_card(&self, name: String, container_id: String) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let Some(container) = dom::by_id(&container_id) else {
                gloo_console::warn!(format!("Container not found: {container_id}"));
                return Ok(JsValue::UNDEFINED);
            };
            bind_container(&inner, &container, &name)?;
            let result = inner.lookup.load_one(&name).await;
            render_result(&inner, &container, &name, result)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `{ containerId: cardName, ... }`; lookups run concurrently.
    #[wasm_bindgen(js_name = loadCards)]
    pub fn load_cards(&self, card_map: JsValue) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let requests: HashMap<String, String> =
                serde_wasm_bindgen::from_value(card_map).map_err(js_err)?;

            let mut containers = HashMap::new();
            for (container_id, name) in &requests {
                match dom::by_id(container_id) {
                    Some(container) => {
                        bind_container(&inner, &container, name)?;
                        containers.insert(container_id.clone(), container);
                    }
                    None => gloo_console::warn!(format!("Container not found: {container_id}")),
                }
            }

            let pending = requests
                .into_iter()
                .filter(|(container_id, _)| containers.contains_key(container_id));
            for (container_id, result) in inner.lookup.load_many(pending).await {
                if let Some(container) = containers.get(&container_id) {
                    let name = match &result {
                        Ok(card) => card.name.clone(),
                        Err(err) => err.card_name().to_owned(),
                    };
                    render_result(&inner, container, &name, result)?;
                }
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Resolves with the number of cards now cached.
    #[wasm_bindgen(js_name = preloadCards)]
    pub fn preload_cards(&self, names: Vec<String>) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let loaded = inner.lookup.preload(&names).await;
            gloo_console::log!(format!("Preloaded {loaded} of {} cards", names.len()));
            Ok(JsValue::from_f64(loaded as f64))
        })
    }

    #[wasm_bindgen(js_name = getCachedCard)]
    pub fn get_cached_card(&self, name: &str) -> Result<JsValue, JsValue> {
        match self.inner.lookup.get_cached(name) {
            Some(card) => to_js(&card),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&self) {
        self.inner.lookup.clear_cache();
        gloo_console::log!("Card cache and banlist cache cleared");
    }

    /// Partial update, e.g. `{ imageBaseUrl, imageExtensions, banlistFormat }`.
    pub fn configure(&self, update: JsValue) -> Result<(), JsValue> {
        let update: ConfigUpdate = serde_wasm_bindgen::from_value(update).map_err(js_err)?;
        self.inner.lookup.configure(update);
        Ok(())
    }

    /// Opens, switches or closes the popup for a cached card.
    #[wasm_bindgen(js_name = showPopup)]
    pub fn show_popup(&self, event: MouseEvent, name: &str) -> Result<(), JsValue> {
        show_popup(&self.inner, &event, name)
    }

    /// `{ forbidden, limited, semiLimited, unrestricted, hasRestrictions }`.
    #[wasm_bindgen(js_name = checkBanlistStatus)]
    pub fn check_banlist_status(&self, names: Vec<String>, options: JsValue) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let options: StatusOptions = if options.is_undefined() || options.is_null() {
                StatusOptions::default()
            } else {
                serde_wasm_bindgen::from_value(options).map_err(js_err)?
            };
            let related = if options.include_related {
                options.related_cards
            } else {
                Vec::new()
            };
            let partition = inner.lookup.check_status(&names, &related).await;
            to_js(&StatusResult {
                has_restrictions: partition.has_restrictions(),
                forbidden: &partition.forbidden,
                limited: &partition.limited,
                semi_limited: &partition.semi_limited,
                unrestricted: &partition.unrestricted,
            })
        })
    }

    /// Primary and related partitions with the impact level.
    #[wasm_bindgen(js_name = classifyBanlist)]
    pub fn classify_banlist(&self, cards: Vec<String>, related: Vec<String>) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let report = inner.lookup.classify_banlist(&cards, &related).await;
            to_js(&report)
        })
    }

    #[wasm_bindgen(js_name = renderBanlistSection)]
    pub fn render_banlist_section(
        &self,
        container_id: String,
        cards: Vec<String>,
        options: JsValue,
    ) -> js_sys::Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let container = dom::by_id(&container_id)
                .ok_or_else(|| JsValue::from_str(&format!("Container not found: {container_id}")))?;
            let options: ReportOptions = serde_wasm_bindgen::from_value(options).map_err(js_err)?;

            container.set_inner_html(banlist_view::LOADING_HTML);
            let report = inner
                .lookup
                .classify_banlist(&cards, &options.related_cards)
                .await;
            let format = inner.lookup.config().banlist_format;
            container.set_inner_html(&banlist_view::render(&report, &options, format));
            Ok(JsValue::UNDEFINED)
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatusOptions {
    include_related: bool,
    related_cards: Vec<String>,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            include_related: true,
            related_cards: Vec::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResult<'a> {
    forbidden: &'a [String],
    limited: &'a [String],
    semi_limited: &'a [String],
    unrestricted: &'a [String],
    has_restrictions: bool,
}

// ── Containers and images ──

fn bind_container(inner: &Shared, container: &Element, name: &str) -> Result<(), JsValue> {
    let inner = inner.clone();
    let name = name.to_owned();
    listen(container, "click", move |event| {
        event.stop_propagation();
        let Ok(mouse) = event.dyn_into::<MouseEvent>() else {
            return;
        };
        if let Err(err) = show_popup(&inner, &mouse, &name) {
            gloo_console::error!(format!("popup for {name} failed: {err:?}"));
        }
    })
}

fn render_result(
    inner: &Shared,
    container: &Element,
    name: &str,
    result: Result<CardRecord, LookupError>,
) -> Result<(), JsValue> {
    match result {
        Ok(card) => display_image(inner, container, &card),
        Err(err) => {
            gloo_console::error!(format!("Failed to load card \"{name}\": {err}"));
            container.set_inner_html(&placeholder_html(&Placeholder::lookup_failed(name)));
            Ok(())
        }
    }
}

fn placeholder_html(placeholder: &Placeholder) -> String {
    let name = escape_html(&placeholder.name);
    match placeholder.diagnostic() {
        Some(diagnostic) => format!(
            r#"<div class="card-placeholder">{name}<br><small>{}</small></div>"#,
            escape_html(&diagnostic)
        ),
        None => format!(r#"<div class="card-placeholder">{name}</div>"#),
    }
}

/// Shows the first candidate image and walks the fallback chain on error.
fn display_image(inner: &Shared, container: &Element, card: &CardRecord) -> Result<(), JsValue> {
    let fallback = ImageFallback::new(&inner.lookup.config(), &card.name, card.id);
    let url = match fallback.first() {
        ImageStep::Try(url) => url,
        ImageStep::Placeholder(placeholder) => {
            container.set_inner_html(&placeholder_html(&placeholder));
            return Ok(());
        }
    };

    let img = dom::create_element("img")?.dyn_into::<HtmlImageElement>()?;
    img.set_alt(&card.name);
    img.set_class_name("w-full h-auto rounded-lg shadow-md");

    let fallback = RefCell::new(fallback);
    let img2 = img.clone();
    let container2 = container.clone();
    let on_error = Closure::wrap(Box::new(move |_: web_sys::Event| {
        match fallback.borrow_mut().on_error() {
            ImageStep::Try(next) => {
                gloo_console::warn!(format!("Image failed, trying {next}"));
                img2.set_src(&next);
            }
            ImageStep::Placeholder(placeholder) => {
                gloo_console::error!(format!(
                    "Image not found: {} ({})",
                    placeholder.name,
                    placeholder.diagnostic().unwrap_or_default()
                ));
                img2.set_onerror(None);
                container2.set_inner_html(&placeholder_html(&placeholder));
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    img.set_src(&url);
    container.set_inner_html("");
    container.append_child(&img)?;
    Ok(())
}

// ── Popup ──

fn ensure_popup() -> Result<HtmlElement, JsValue> {
    if let Some(existing) = dom::by_id_typed::<HtmlElement>(POPUP_ID) {
        return Ok(existing);
    }
    let popup = dom::create_element("div")?.dyn_into::<HtmlElement>()?;
    popup.set_id(POPUP_ID);
    popup.set_class_name(POPUP_CLASS);
    dom::set_style(&popup, "display", "none");
    let body = dom::document()?
        .body()
        .ok_or_else(|| JsValue::from_str("no <body>"))?;
    body.append_child(&popup)?;
    Ok(popup)
}

fn popup_html(content: &PopupContent) -> String {
    let description = content
        .description
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>");
    let stats = content
        .stats
        .as_ref()
        .map(|stats| format!(r#"<p class="mt-2 text-yellow-400 font-bold">{}</p>"#, escape_html(stats)))
        .unwrap_or_default();
    format!(
        r#"<div><h3 class="text-blue-400 font-bold text-lg mb-2">{}</h3><p class="text-xs text-gray-300">{}</p><div class="w-full h-px bg-blue-500 my-2"></div><p class="text-xs text-white">{description}</p>{stats}</div>"#,
        escape_html(&content.title),
        escape_html(&content.type_line),
    )
}

fn show_popup(inner: &Shared, event: &MouseEvent, name: &str) -> Result<(), JsValue> {
    match inner.lookup.show_popup(name) {
        PopupTransition::Opened(card) | PopupTransition::Switched { to: card, .. } => {
            open_popup(inner, event, &card)
        }
        PopupTransition::Closed(_) => {
            fade_out(inner);
            Ok(())
        }
        PopupTransition::Ignored => Ok(()),
    }
}

fn open_popup(inner: &Shared, event: &MouseEvent, name: &str) -> Result<(), JsValue> {
    let Some(content) = inner.lookup.popup_content(name) else {
        return Ok(());
    };
    let popup = &inner.popup;
    dom::set_style(popup, "opacity", "0");
    popup.set_inner_html(&popup_html(&content));
    dom::set_style(popup, "display", "block");

    let window = dom::window()?;
    let viewport = Size {
        width: window.inner_width()?.as_f64().unwrap_or_default(),
        height: window.inner_height()?.as_f64().unwrap_or_default(),
    };
    let size = Size {
        width: f64::from(popup.offset_width()),
        height: f64::from(popup.offset_height()),
    };
    let placement = inner.lookup.place_popup(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        size,
        viewport,
    );
    dom::set_style(popup, "left", &format!("{}px", placement.left));
    dom::set_style(popup, "top", &format!("{}px", placement.top));

    let popup = popup.clone();
    Timeout::new(FADE_IN_MS, move || dom::set_style(&popup, "opacity", "1")).forget();
    Ok(())
}

fn fade_out(inner: &Shared) {
    dom::set_style(&inner.popup, "opacity", "0");
    let inner = inner.clone();
    Timeout::new(FADE_OUT_MS, move || {
        // A show during the fade keeps the popup on screen.
        if inner.lookup.popup_state() == PopupState::Hidden {
            dom::set_style(&inner.popup, "display", "none");
        }
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_shows_missing_id_when_known() {
        let missing = Placeholder {
            name: "Dark Magician".into(),
            missing_id: Some(46986414),
        };
        assert_eq!(
            placeholder_html(&missing),
            r#"<div class="card-placeholder">Dark Magician<br><small>Missing: 46986414</small></div>"#
        );
        assert_eq!(
            placeholder_html(&Placeholder::lookup_failed("A & B")),
            r#"<div class="card-placeholder">A &amp; B</div>"#
        );
    }

    #[test]
    fn popup_markup_joins_description_lines() {
        let content = PopupContent {
            title: "Kuriboh".into(),
            type_line: "[Fiend / Effect]".into(),
            description: vec!["Line one.".into(), "Line <two>.".into()],
            stats: Some("ATK/300 DEF/200".into()),
        };
        let html = popup_html(&content);
        assert!(html.contains("Line one.<br>Line &lt;two&gt;."));
        assert!(html.contains("ATK/300 DEF/200"));
        assert!(html.contains("[Fiend / Effect]"));
    }
}
