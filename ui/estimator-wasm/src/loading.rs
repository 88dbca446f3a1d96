//! Splash screen with a simulated progress bar.
//!
//! The bar advances in random increments until it hits 100%, then the page
//! redirects to the landing page. Purely cosmetic pacing; nothing waits on
//! real work.

use crate::dom;
use gloo_timers::callback::{Interval, Timeout};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const TICK_MS: u32 = 150;
const REDIRECT_DELAY_MS: u32 = 500;

pub fn init() {
    let progress = Rc::new(Cell::new(0u32));
    let handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));

    let interval = {
        let progress = Rc::clone(&progress);
        let handle = Rc::clone(&handle);
        Interval::new(TICK_MS, move || {
            let step = (js_sys::Math::random() * 5.0) as u32 + 1;
            let p = (progress.get() + step).min(100);
            progress.set(p);
            render(p);

            if p >= 100 {
                // Dropping the interval stops the ticks.
                handle.borrow_mut().take();
                Timeout::new(REDIRECT_DELAY_MS, || dom::redirect("index.html")).forget();
            }
        })
    };
    *handle.borrow_mut() = Some(interval);
}

fn render(progress: u32) {
    let width = format!("{progress}%");
    for selector in [".loading-fill-left", ".loading-fill-right"] {
        if let Some(el) = dom::query(selector) {
            if let Some(html) = wasm_bindgen::JsCast::dyn_ref::<web_sys::HtmlElement>(&el) {
                let _ = html.style().set_property("width", &width);
            }
        }
    }
    if let Some(text) = dom::query(".loading-progress-text") {
        dom::set_text(&text, &width);
    }
}
