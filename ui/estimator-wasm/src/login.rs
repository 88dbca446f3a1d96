//! Login page controller.

use crate::dom;
use crate::nav;
use crate::notify;
use crate::session;
use crate::api::ApiError;
use ret_rules::{Context, RuleSet, evaluate};
use std::cell::Cell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlButtonElement;

thread_local! {
    static IN_FLIGHT: Cell<bool> = const { Cell::new(false) };
}

pub fn init() -> Result<(), JsValue> {
    // Already signed in: the form has nothing to offer.
    if session::is_authenticated() {
        dom::redirect(nav::CALCULATOR_PAGE);
        return Ok(());
    }

    let form = dom::req_form("login-form")?;
    let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
        e.prevent_default();
        wasm_bindgen_futures::spawn_local(on_submit());
    }) as Box<dyn FnMut(_)>);
    form.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn validate() -> Result<(String, String), (String, String)> {
    let username = dom::input_value_by_id("username");
    let password = dom::input_value_by_id("password");
    let ctx = Context::new();

    let checks = [
        ("username", &username, RuleSet::required("Proszę podać nazwę użytkownika")),
        ("password", &password, RuleSet::required("Proszę podać hasło")),
    ];
    for (field, value, rules) in &checks {
        let verdict = evaluate(field, value, rules, &ctx);
        if !verdict.valid {
            return Err((
                (*field).to_owned(),
                verdict.message.unwrap_or_else(|| "Nieprawidłowa wartość".to_owned()),
            ));
        }
    }
    Ok((username, password))
}

async fn on_submit() {
    if IN_FLIGHT.with(Cell::get) {
        return;
    }

    let (username, password) = match validate() {
        Ok(values) => values,
        Err((field, message)) => {
            if let Some(el) = dom::by_id(&field) {
                dom::add_class(&el, "error");
                dom::focus(&el);
            }
            notify::error(&message);
            return;
        }
    };

    IN_FLIGHT.with(|f| f.set(true));
    set_loading(true);

    match session::login(&username, &password).await {
        Ok(()) => {
            notify::success("Zalogowano pomyślnie!");
            dom::redirect(nav::CALCULATOR_PAGE);
        }
        Err(e) => {
            let message = match e.status() {
                Some(401) => "Nieprawidłowa nazwa użytkownika lub hasło".to_owned(),
                _ => match e {
                    ApiError::Network(_) => e.to_string(),
                    other => format!("Błąd logowania: {other}"),
                },
            };
            notify::error(&message);
        }
    }

    set_loading(false);
    IN_FLIGHT.with(|f| f.set(false));
}

fn set_loading(loading: bool) {
    for el in dom::query_all("#login-form button[type=\"submit\"]") {
        if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
            btn.set_disabled(loading);
            btn.set_text_content(Some(if loading { "Logowanie..." } else { "Zaloguj się" }));
        }
    }
}
