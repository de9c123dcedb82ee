//! Data sources: the catalog data script and the card database over
//! `fetch`.

use crate::dom;
use an_api_types::{ApiCard, ArchetypeRecord, BanlistFormat, CardInfoResponse, CardSetInfo};
use an_card_client::CardDatabase;
use an_catalog::CatalogError;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub const CATALOG_SCRIPT: &str = "assets/js/archetypes-data.js";
pub const CATALOG_GLOBAL: &str = "archetypes";
pub const DEFAULT_ENDPOINT: &str = "https://db.ygoprodeck.com/api/v7";

// ── Catalog ──

fn catalog_global() -> Option<JsValue> {
    let value = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(CATALOG_GLOBAL)).ok()?;
    js_sys::Array::is_array(&value).then_some(value)
}

/// Appends the data script and resolves once it has run.
async fn inject_catalog_script() -> Result<(), JsValue> {
    let doc = dom::document()?;
    let head = doc.head().ok_or_else(|| JsValue::from_str("no <head>"))?;
    let script = doc
        .create_element("script")?
        .dyn_into::<web_sys::HtmlScriptElement>()?;
    script.set_src(CATALOG_SCRIPT);
    script.set_defer(true);

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    head.append_child(&script)?;
    JsFuture::from(loaded).await?;
    Ok(())
}

/// The catalog array published by the data script as a page global.
pub async fn load_catalog() -> Result<Vec<ArchetypeRecord>, CatalogError> {
    let value = match catalog_global() {
        Some(value) => value,
        None => {
            inject_catalog_script()
                .await
                .map_err(|_| CatalogError::DataUnavailable("failed to load archetype data".into()))?;
            catalog_global().ok_or_else(|| {
                CatalogError::DataUnavailable("archetype data not loaded properly".into())
            })?
        }
    };

    let raw = js_sys::JSON::stringify(&value)
        .ok()
        .and_then(|s| s.as_string())
        .ok_or_else(|| CatalogError::DataUnavailable("archetype data is not serializable".into()))?;
    an_catalog::parse_catalog(&raw)
}

// ── Card database ──

/// [`CardDatabase`] over the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct GlooCardDatabase {
    endpoint: String,
}

impl Default for GlooCardDatabase {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl GlooCardDatabase {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn card_info_url(&self) -> String {
        format!("{}/cardinfo.php", self.endpoint)
    }

    async fn body(what: &str, response: Response) -> Result<String> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("ygoprodeck {what} body"))?;
        if !response.ok() {
            bail!("ygoprodeck {what} HTTP {status} {}", response.status_text());
        }
        Ok(text)
    }

    fn decode_cards(text: &str) -> Result<Vec<ApiCard>> {
        let parsed: CardInfoResponse =
            serde_json::from_str(text).context("ygoprodeck cardinfo parse")?;
        Ok(parsed.data)
    }
}

#[async_trait(?Send)]
impl CardDatabase for GlooCardDatabase {
    async fn card_by_name(&self, name: &str) -> Result<Option<ApiCard>> {
        let response = Request::get(&self.card_info_url())
            .query([("name", name)])
            .send()
            .await
            .context("ygoprodeck card_by_name transport")?;
        // Unknown names come back as 400.
        if response.status() == 400 {
            return Ok(None);
        }
        let text = Self::body("card_by_name", response).await?;
        Ok(Self::decode_cards(&text)?.into_iter().next())
    }

    async fn banlist(&self, format: BanlistFormat) -> Result<Vec<ApiCard>> {
        let response = Request::get(&self.card_info_url())
            .query([("banlist", format.as_query())])
            .send()
            .await
            .context("ygoprodeck banlist transport")?;
        let text = Self::body("banlist", response).await?;
        Self::decode_cards(&text)
    }

    async fn card_sets(&self) -> Result<Vec<CardSetInfo>> {
        let response = Request::get(&format!("{}/cardsets.php", self.endpoint))
            .send()
            .await
            .context("ygoprodeck card_sets transport")?;
        let text = Self::body("card_sets", response).await?;
        serde_json::from_str(&text).context("ygoprodeck cardsets parse")
    }

    async fn all_cards(&self) -> Result<Vec<ApiCard>> {
        let response = Request::get(&self.card_info_url())
            .send()
            .await
            .context("ygoprodeck all_cards transport")?;
        let text = Self::body("all_cards", response).await?;
        Self::decode_cards(&text)
    }
}
