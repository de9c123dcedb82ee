//! Catalog page state.
//!
//! One [`AppContext`] is built at startup and shared as an `Rc` by every
//! event handler. Interior mutability is `RefCell`; the page is
//! single-threaded and no borrow is held across an `.await`.

use crate::dom::Elements;
use crate::storage::BrowserStore;
use crate::timers::Debouncer;
use an_catalog::{CatalogBrowser, IconScheduler, LetterFilter};
use an_storage::PersistenceBridge;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::IntersectionObserver;

pub const SEARCH_DEBOUNCE_MS: u32 = 300;
pub const SCROLL_SAVE_DEBOUNCE_MS: u32 = 100;
pub const SCROLL_RESTORE_DELAY_MS: u32 = 200;
pub const LOAD_MORE_SETTLE_MS: u32 = 200;
pub const POPSTATE_DELAY_MS: u32 = 100;

pub struct AppContext {
    pub els: Elements,
    pub browser: RefCell<CatalogBrowser>,
    pub bridge: PersistenceBridge<BrowserStore>,
    pub icons: RefCell<IconScheduler>,
    pub rng: RefCell<StdRng>,
    /// Observer for pending icon slots; replaced whenever the grid is.
    pub icon_observer: RefCell<Option<IntersectionObserver>>,
    pub search_debounce: Debouncer,
    pub scroll_debounce: Debouncer,
}

pub type Ctx = Rc<AppContext>;

impl AppContext {
    pub fn new(els: Elements, browser: CatalogBrowser) -> Ctx {
        Rc::new(AppContext {
            els,
            browser: RefCell::new(browser),
            bridge: PersistenceBridge::new(BrowserStore),
            icons: RefCell::new(IconScheduler::default()),
            rng: RefCell::new(StdRng::from_entropy()),
            icon_observer: RefCell::new(None),
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE_MS),
            scroll_debounce: Debouncer::new(SCROLL_SAVE_DEBOUNCE_MS),
        })
    }

    pub fn current_letter(&self) -> LetterFilter {
        self.browser.borrow().state().letter
    }

    /// Persist everything needed to come back to the same place.
    pub fn save_position(&self) {
        self.bridge.save_scroll(crate::dom::scroll_y());
        self.bridge.save_letter(&self.current_letter().to_string());
        let search = self.browser.borrow().state().search_query.clone();
        self.bridge.save_search(&search);
    }

    pub fn restored_letter(&self) -> Option<LetterFilter> {
        let raw = self.bridge.restore_letter()?;
        match raw.parse() {
            Ok(letter) => Some(letter),
            Err(err) => {
                gloo_console::warn!(format!("ignoring saved letter: {err}"));
                None
            }
        }
    }
}
