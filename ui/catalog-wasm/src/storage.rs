//! `localStorage` behind [`KeyValueStore`].
//!
//! Private browsing modes can refuse storage entirely or throw on every
//! write; both surface as errors for the persistence bridge to absorb.

use an_storage::KeyValueStore;
use anyhow::{Result, anyhow};
use gloo_storage::{LocalStorage, Storage};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn storage(&self) -> Result<web_sys::Storage> {
        // LocalStorage::raw() throws when storage is missing, so probe first.
        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        match window.local_storage() {
            Ok(Some(_)) => Ok(LocalStorage::raw()),
            Ok(None) => Err(anyhow!("localStorage is not available")),
            Err(err) => Err(js_error("open localStorage", err)),
        }
    }
}

fn js_error(action: &str, err: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!("{action}: {}", err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| js_error("read", err))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| js_error("write", err))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| js_error("remove", err))
    }
}
