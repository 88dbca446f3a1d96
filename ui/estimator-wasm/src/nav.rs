//! Auth-driven page chrome.
//!
//! Swaps login/logout links, dims protected navigation for anonymous
//! visitors, shows the signed-in greeting, and guards the calculator page.
//! Re-renders on session observer events.

use crate::dom;
use crate::session;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub const LOGIN_PAGE: &str = "login.html";
pub const CALCULATOR_PAGE: &str = "calculator.html";

pub fn init() {
    render();
    session::on_login(session::deferred(render));
    session::on_logout(session::deferred(render));
}

/// Redirect anonymous visitors off the calculator page. The reports page
/// renders its own login prompt instead of redirecting.
pub fn guard_calculator_page() -> bool {
    let path = dom::window().location().pathname().unwrap_or_default();
    if path.contains("calculator") && !session::is_authenticated() {
        dom::redirect(LOGIN_PAGE);
        return false;
    }
    true
}

pub fn render() {
    let authed = session::is_authenticated();
    update_login_links(authed);
    update_protected_links(authed);
    update_user_display(authed);
}

fn update_login_links(authed: bool) {
    for link in dom::query_all("a[href*='login']") {
        let Some(html) = link.dyn_ref::<HtmlElement>() else {
            continue;
        };
        if authed {
            html.set_text_content(Some("WYLOGUJ"));
            let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
                session::logout();
                dom::redirect(LOGIN_PAGE);
            }) as Box<dyn FnMut(_)>);
            html.set_onclick(Some(cb.as_ref().unchecked_ref()));
            cb.forget();
        } else {
            html.set_text_content(Some("LOGIN"));
            html.set_onclick(None);
        }
    }
}

fn update_protected_links(authed: bool) {
    for link in dom::query_all("a[href*='calculator'], a[href*='reports']") {
        let Some(html) = link.dyn_ref::<HtmlElement>() else {
            continue;
        };
        if authed {
            let _ = html.style().set_property("opacity", "1");
            let _ = html.set_attribute("title", "");
            html.set_onclick(None);
        } else {
            let _ = html.style().set_property("opacity", "0.5");
            let _ = html.set_attribute("title", "Wymagane logowanie");
            let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
                dom::redirect(LOGIN_PAGE);
            }) as Box<dyn FnMut(_)>);
            html.set_onclick(Some(cb.as_ref().unchecked_ref()));
            cb.forget();
        }
    }
}

fn update_user_display(authed: bool) {
    let display = match dom::query(".user-display") {
        Some(el) => el,
        None => {
            let Some(navbar) = dom::query(".navbar") else {
                return;
            };
            let el = dom::create_element("div");
            let _ = el.set_attribute("class", "user-display");
            let _ = el.set_attribute(
                "style",
                "display:none;align-items:center;gap:10px;margin-left:auto;font-size:12px;color:#fff;",
            );
            let _ = navbar.append_child(&el);
            el
        }
    };

    let user = session::current_user();
    if !authed || user.is_none() {
        dom::set_display(&display, "none");
        return;
    }
    let user = user.unwrap();

    display.set_inner_html("");
    let greeting = dom::create_element("span");
    let _ = greeting.set_attribute("class", "user-greeting");
    greeting.set_text_content(Some(&format!("Witaj, {}", user.username)));
    let _ = display.append_child(&greeting);

    let button = dom::create_element("button");
    let _ = button.set_attribute("class", "logout-btn");
    button.set_text_content(Some("Wyloguj"));
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        session::logout();
        dom::redirect(LOGIN_PAGE);
    }) as Box<dyn FnMut(_)>);
    let _ = button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
    cb.forget();
    let _ = display.append_child(&button);

    dom::set_display(&display, "flex");
}
