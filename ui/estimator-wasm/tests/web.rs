//! Browser-side tests for the DOM helpers and notifications.

#![cfg(target_arch = "wasm32")]

use estimator_wasm::{dom, notify};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn show_replaces_the_previous_message() {
    notify::info("Obliczenia w toku...");
    notify::error("Problem z połączeniem");

    let messages = dom::query_all(".app-message");
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].text_content().unwrap_or_default(),
        "Problem z połączeniem"
    );

    notify::clear();
    assert!(dom::query(".app-message").is_none());
}

#[wasm_bindgen_test]
fn detached_elements_count_as_hidden() {
    let el = dom::create_element("div");
    assert!(!dom::is_visible(&el));

    let body = dom::document().body().unwrap();
    body.append_child(&el).unwrap();
    assert!(dom::is_visible(&el));

    el.remove();
    assert!(!dom::is_visible(&el));
}

#[wasm_bindgen_test]
fn radio_value_reads_only_the_checked_input() {
    let body = dom::document().body().unwrap();
    body.set_inner_html(
        r#"<input type="radio" name="sex" value="m">
           <input type="radio" name="sex" value="f" checked>"#,
    );

    assert_eq!(dom::radio_value("sex"), "f");
    assert_eq!(dom::radio_value("missing-group"), "");

    body.set_inner_html("");
}
