//! Debouncing and frame/timer waits.

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Runs only the last callback scheduled within `delay_ms`. Dropping a
/// pending [`Timeout`] cancels it.
pub struct Debouncer {
    delay_ms: u32,
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn schedule(&self, callback: impl FnOnce() + 'static) {
        let timeout = Timeout::new(self.delay_ms, callback);
        self.pending.replace(Some(timeout));
    }

    pub fn cancel(&self) {
        self.pending.replace(None);
    }
}

pub async fn sleep(ms: u32) {
    TimeoutFuture::new(ms).await;
}

/// Resolves on the next animation frame, after pending layout.
pub async fn next_frame() -> Result<(), JsValue> {
    let window = crate::dom::window()?;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = window.request_animation_frame(&resolve);
    });
    JsFuture::from(promise).await?;
    Ok(())
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
