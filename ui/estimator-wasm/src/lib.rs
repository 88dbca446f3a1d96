//! Retirement estimator WASM frontend.
//!
//! One module per page plus shared session, API, and DOM layers. The entry
//! point detects the current page by its landmark element and initializes
//! the matching controller; pure logic lives in the `ret-*` crates.

pub mod api;
pub mod calculator;
pub mod dom;
pub mod landing;
pub mod loading;
pub mod login;
pub mod nav;
pub mod notify;
pub mod reports;
pub mod session;
pub mod signup;

use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    // Splash screen has no chrome or session concerns.
    if dom::query(".loading-fill-left").is_some() {
        loading::init();
        return Ok(());
    }

    nav::init();
    if !nav::guard_calculator_page() {
        return Ok(());
    }
    session::start_refresh_timer();

    if dom::by_id("mode-selection").is_some() {
        calculator::init()?;
    } else if dom::by_id("login-form").is_some() {
        login::init()?;
    } else if dom::by_id("signup-form").is_some() {
        signup::init()?;
    } else if dom::by_id("reports-content").is_some() {
        reports::init()?;
    } else {
        landing::init();
    }

    Ok(())
}
