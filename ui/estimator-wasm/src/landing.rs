//! Landing page: backend reachability indicator and live statistics.

use crate::api;
use crate::dom;
use crate::session;
use ret_wizard::format;
use gloo_timers::callback::Timeout;

pub fn init() {
    if dom::by_id("connection-status").is_some() {
        wasm_bindgen_futures::spawn_local(check_connection());
    }
    if dom::query(".live-statistics").is_some() && session::is_authenticated() {
        wasm_bindgen_futures::spawn_local(load_statistics());
    }
}

async fn check_connection() {
    let Some(status) = dom::by_id("connection-status") else {
        return;
    };

    match api::health_check().await {
        Ok(_) => {
            dom::set_text(&status, "Połączono z serwerem");
            dom::remove_class(&status, "disconnected");
            dom::add_class(&status, "connected");
            // A healthy backend is the normal case; hide the banner shortly.
            let status = status.clone();
            Timeout::new(3000, move || dom::set_display(&status, "none")).forget();
        }
        Err(_) => {
            dom::set_text(
                &status,
                "Brak połączenia z serwerem. Obliczenia są niedostępne.",
            );
            dom::remove_class(&status, "connected");
            dom::add_class(&status, "disconnected");
        }
    }
}

/// Marketing numbers pulled from the reports endpoint. Failures are silent;
/// the section simply keeps its static placeholders.
async fn load_statistics() {
    let Ok(rows) = api::get_reports().await else {
        return;
    };

    dom::set_text_by_id("stat-calculations", &rows.len().to_string());

    let salaries: Vec<f64> = rows.iter().filter_map(|r| r.salary).collect();
    if !salaries.is_empty() {
        dom::set_text_by_id(
            "stat-avg-salary",
            &format::pln(salaries.iter().sum::<f64>() / salaries.len() as f64),
        );
    }
}
