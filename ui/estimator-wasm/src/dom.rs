//! DOM helpers.
//!
//! Thin lookup and mutation wrappers over `web_sys`. Page controllers
//! resolve their elements once at init through the `req_*` getters and keep
//! typed references after that.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement};

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

// ── Required lookups, used while binding a page ──

pub fn req_el(id: &str) -> Result<Element, JsValue> {
    by_id(id).ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

pub fn req_html(id: &str) -> Result<HtmlElement, JsValue> {
    by_id_typed::<HtmlElement>(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing html element #{id}")))
}

pub fn req_form(id: &str) -> Result<HtmlFormElement, JsValue> {
    by_id_typed::<HtmlFormElement>(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing form #{id}")))
}

// ── Values ──

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn input_value_by_id(id: &str) -> String {
    by_id_typed::<HtmlInputElement>(id)
        .map(|el| get_input_value(&el))
        .unwrap_or_default()
}

pub fn checkbox_checked(id: &str) -> bool {
    by_id_typed::<HtmlInputElement>(id)
        .map(|el| el.checked())
        .unwrap_or(false)
}

/// Value of the checked radio in a named group, empty when none is checked.
pub fn radio_value(name: &str) -> String {
    query(&format!("input[name=\"{name}\"]:checked"))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|el| el.value())
        .unwrap_or_default()
}

// ── Classes and text ──

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_text_by_id(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
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

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

// ── Visibility and focus ──

/// A field hidden by conditional display (itself or an ancestor with
/// `display:none`) has no offsetParent.
pub fn is_visible(el: &Element) -> bool {
    el.dyn_ref::<HtmlElement>()
        .map(|html| html.offset_parent().is_some())
        .unwrap_or(false)
}

pub fn set_display(el: &Element, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}

pub fn focus(el: &Element) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
}

pub fn redirect(path: &str) {
    let _ = window().location().set_href(path);
}
