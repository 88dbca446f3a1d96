//! Transient user notifications.
//!
//! Every asynchronous failure is caught at a page-controller boundary and
//! converted into one of these auto-dismissing toasts; nothing propagates
//! as an unhandled rejection.

use crate::dom;
use gloo_timers::callback::Timeout;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Success,
    Error,
}

impl Kind {
    fn class(self) -> &'static str {
        match self {
            Kind::Info => "info",
            Kind::Success => "success",
            Kind::Error => "error",
        }
    }

    fn colors(self) -> &'static str {
        match self {
            Kind::Info => "background-color:#eff6ff;color:#2563eb;border:1px solid #bfdbfe;",
            Kind::Success => "background-color:#f0fdf4;color:#16a34a;border:1px solid #bbf7d0;",
            Kind::Error => "background-color:#fee2e2;color:#dc2626;border:1px solid #fecaca;",
        }
    }

    fn dismiss_after_ms(self) -> u32 {
        match self {
            Kind::Error => 5000,
            _ => 3000,
        }
    }
}

pub fn info(message: &str) {
    show(message, Kind::Info);
}

pub fn success(message: &str) {
    show(message, Kind::Success);
}

pub fn error(message: &str) {
    show(message, Kind::Error);
}

pub fn show(message: &str, kind: Kind) {
    clear();

    let div = dom::create_element("div");
    let _ = div.set_attribute("class", &format!("app-message {}", kind.class()));
    let _ = div.set_attribute(
        "style",
        &format!(
            "position:fixed;top:20px;right:20px;z-index:10000;min-width:300px;max-width:500px;\
             padding:12px 16px;border-radius:8px;font-size:14px;box-shadow:0 4px 12px rgba(0,0,0,0.15);{}",
            kind.colors()
        ),
    );
    div.set_text_content(Some(message));

    if let Some(body) = dom::document().body() {
        let _ = body.append_child(&div);
    }

    Timeout::new(kind.dismiss_after_ms(), move || div.remove()).forget();
}

pub fn clear() {
    for el in dom::query_all(".app-message") {
        el.remove();
    }
}
