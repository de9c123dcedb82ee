use an_api_types::BanlistFormat;
use an_storage::DAY_MS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://storage.googleapis.com/yugioh-card-images-archetype-nexus/cards";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupConfig {
    pub image_base_url: String,
    /// Tried in order when an image fails to load.
    pub image_extensions: Vec<String>,
    pub banlist_format: BanlistFormat,
    pub banlist_ttl_ms: u64,
    pub popup_cushion_px: f64,
    /// Viewports narrower than this get the centered popup.
    pub narrow_breakpoint_px: f64,
    /// Hide requests this soon after a show are ignored.
    pub hide_guard_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_owned(),
            image_extensions: vec![".png".to_owned(), ".jpg".to_owned()],
            banlist_format: BanlistFormat::Tcg,
            banlist_ttl_ms: DAY_MS,
            popup_cushion_px: 20.0,
            narrow_breakpoint_px: 640.0,
            hide_guard_ms: 100,
        }
    }
}

/// Partial update accepted by `configure`; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub image_base_url: Option<String>,
    pub image_extensions: Option<Vec<String>>,
    pub banlist_format: Option<BanlistFormat>,
    pub banlist_ttl_ms: Option<u64>,
    pub popup_cushion_px: Option<f64>,
    pub narrow_breakpoint_px: Option<f64>,
    pub hide_guard_ms: Option<u64>,
}

impl LookupConfig {
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(url) = update.image_base_url {
            self.image_base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(extensions) = update.image_extensions.filter(|e| !e.is_empty()) {
            self.image_extensions = extensions;
        }
        if let Some(format) = update.banlist_format {
            self.banlist_format = format;
        }
        if let Some(ttl) = update.banlist_ttl_ms {
            self.banlist_ttl_ms = ttl;
        }
        if let Some(cushion) = update.popup_cushion_px {
            self.popup_cushion_px = cushion;
        }
        if let Some(breakpoint) = update.narrow_breakpoint_px {
            self.narrow_breakpoint_px = breakpoint;
        }
        if let Some(guard) = update.hide_guard_ms {
            self.hide_guard_ms = guard;
        }
    }
}
