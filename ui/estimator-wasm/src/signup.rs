//! Signup page controller.
//!
//! Account creation is not part of the backend yet; the form validates for
//! real and then simulates the registration call. The rules table is the
//! richest user of the validation engine, so it stays declarative: one
//! [`RuleSet`] per field, evaluated on blur and again on submit.

use crate::dom;
use crate::nav;
use crate::notify;
use gloo_timers::future::TimeoutFuture;
use ret_rules::{Context, Pattern, RuleSet, Verdict, evaluate};
use std::cell::Cell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlButtonElement;

/// Document order; submit reports errors top to bottom.
const FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "email",
    "phone",
    "birthDate",
    "password",
    "confirmPassword",
    "terms",
];

thread_local! {
    static IN_FLIGHT: Cell<bool> = const { Cell::new(false) };
}

fn rules_for(field: &str) -> RuleSet {
    match field {
        "firstName" => RuleSet::required("Imię może zawierać tylko litery")
            .min_length(2)
            .pattern(Pattern::PersonName),
        "lastName" => RuleSet::required("Nazwisko może zawierać tylko litery")
            .min_length(2)
            .pattern(Pattern::PersonName),
        "email" => RuleSet::required("Wprowadź poprawny adres email").pattern(Pattern::Email),
        "phone" => {
            RuleSet::optional("Wprowadź poprawny numer telefonu").pattern(Pattern::PhonePl)
        }
        "birthDate" => {
            RuleSet::required("Musisz mieć od 18 do 100 lat").custom(age_in_range)
        }
        "password" => RuleSet::required("Hasło musi zawierać małą i wielką literę oraz cyfrę")
            .min_length(8)
            .pattern(Pattern::StrongPassword),
        "confirmPassword" => RuleSet::required("Hasła muszą być identyczne")
            .custom(|value, ctx| value == ctx.value("password")),
        "terms" => {
            RuleSet::optional("Musisz zaakceptować regulamin").custom(|_, ctx| ctx.is_checked("terms"))
        }
        _ => RuleSet::optional(""),
    }
}

fn age_in_range(value: &str, _ctx: &Context) -> bool {
    // Input type=date, "YYYY-MM-DD".
    let Some(year) = value.get(..4).and_then(|y| y.parse::<i32>().ok()) else {
        return false;
    };
    let age = js_sys::Date::new_0().get_full_year() as i32 - year;
    (18..=100).contains(&age)
}

fn read_field(field: &str) -> String {
    if field == "terms" {
        return if dom::checkbox_checked("terms") { "true" } else { "false" }.to_owned();
    }
    dom::input_value_by_id(field)
}

fn context() -> Context {
    let mut ctx = Context::new();
    for field in FIELDS {
        ctx.set(field, &read_field(field));
    }
    ctx
}

pub fn init() -> Result<(), JsValue> {
    let form = dom::req_form("signup-form")?;

    for field in FIELDS {
        let Some(el) = dom::by_id(field) else {
            continue;
        };
        let field = *field;
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            show_verdict(field, &check(field));
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("blur", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
        e.prevent_default();
        wasm_bindgen_futures::spawn_local(on_submit());
    }) as Box<dyn FnMut(_)>);
    form.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn check(field: &str) -> Verdict {
    evaluate(field, &read_field(field), &rules_for(field), &context())
}

fn show_verdict(field: &str, verdict: &Verdict) {
    let Some(el) = dom::by_id(field) else {
        return;
    };
    if verdict.valid {
        dom::remove_class(&el, "error");
        dom::set_text_by_id(&format!("{field}-error"), "");
    } else {
        dom::add_class(&el, "error");
        dom::set_text_by_id(
            &format!("{field}-error"),
            verdict.message.as_deref().unwrap_or("Nieprawidłowa wartość"),
        );
    }
}

async fn on_submit() {
    if IN_FLIGHT.with(Cell::get) {
        return;
    }

    let mut first_invalid: Option<(String, String)> = None;
    for field in FIELDS {
        let verdict = check(field);
        show_verdict(field, &verdict);
        if !verdict.valid && first_invalid.is_none() {
            first_invalid = Some((
                (*field).to_owned(),
                verdict
                    .message
                    .unwrap_or_else(|| "Nieprawidłowa wartość".to_owned()),
            ));
        }
    }

    if let Some((field, message)) = first_invalid {
        if let Some(el) = dom::by_id(&field) {
            el.scroll_into_view();
            dom::focus(&el);
        }
        notify::error(&message);
        return;
    }

    IN_FLIGHT.with(|f| f.set(true));
    set_loading(true);
    notify::info("Tworzenie konta...");

    // Simulated registration latency until the backend grows an endpoint.
    TimeoutFuture::new(2000).await;

    notify::success("Konto utworzone pomyślnie! Przekierowanie do logowania...");
    TimeoutFuture::new(1500).await;
    dom::redirect(nav::LOGIN_PAGE);

    set_loading(false);
    IN_FLIGHT.with(|f| f.set(false));
}

fn set_loading(loading: bool) {
    for el in dom::query_all("#signup-form button[type=\"submit\"]") {
        if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
            btn.set_disabled(loading);
            btn.set_text_content(Some(if loading {
                "Tworzenie konta..."
            } else {
                "Utwórz konto"
            }));
        }
    }
}
