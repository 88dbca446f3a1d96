//! Usage reports page.
//!
//! Auth-gated: anonymous visitors see an inline login prompt rather than a
//! redirect, so the page stays linkable. Rows come straight from
//! `GET /reports` and are summarized client-side.

use crate::api;
use crate::dom;
use crate::notify;
use crate::session;
use ret_api_types::{ReportRow, Sex};
use ret_wizard::format;
use wasm_bindgen::JsValue;

pub fn init() -> Result<(), JsValue> {
    render_gate();
    session::on_login(session::deferred(on_session_change));
    session::on_logout(session::deferred(on_session_change));
    Ok(())
}

fn on_session_change() {
    render_gate();
}

fn render_gate() {
    let authed = session::is_authenticated();
    if let Some(content) = dom::by_id("reports-content") {
        dom::set_display(&content, if authed { "block" } else { "none" });
    }
    if let Some(prompt) = dom::by_id("auth-required-message") {
        dom::set_display(&prompt, if authed { "none" } else { "block" });
    }
    if authed {
        wasm_bindgen_futures::spawn_local(load());
    }
}

async fn load() {
    match api::get_reports().await {
        Ok(rows) => render(&rows),
        Err(e) => notify::error(&format!("Błąd pobierania raportów: {e}")),
    }
}

fn render(rows: &[ReportRow]) {
    render_stats(rows);
    render_table(rows);
}

fn render_stats(rows: &[ReportRow]) {
    dom::set_text_by_id("reports-count", &rows.len().to_string());

    let ages: Vec<u32> = rows.iter().filter_map(|r| r.age).collect();
    let avg_age = if ages.is_empty() {
        "---".to_owned()
    } else {
        format!("{:.0}", ages.iter().sum::<u32>() as f64 / ages.len() as f64)
    };
    dom::set_text_by_id("reports-avg-age", &avg_age);

    let salaries: Vec<f64> = rows.iter().filter_map(|r| r.salary).collect();
    let avg_salary = if salaries.is_empty() {
        "---".to_owned()
    } else {
        format::pln(salaries.iter().sum::<f64>() / salaries.len() as f64)
    };
    dom::set_text_by_id("reports-avg-salary", &avg_salary);
}

fn render_table(rows: &[ReportRow]) {
    let Some(tbody) = dom::query("#reports-table tbody") else {
        return;
    };
    tbody.set_inner_html("");

    if rows.is_empty() {
        let tr = dom::create_element("tr");
        let td = dom::create_element("td");
        let _ = td.set_attribute("colspan", "5");
        td.set_text_content(Some("Brak zapisanych obliczeń"));
        let _ = tr.append_child(&td);
        let _ = tbody.append_child(&tr);
        return;
    }

    for row in rows {
        let tr = dom::create_element("tr");
        let cells = [
            row.age.map(|a| a.to_string()),
            row.sex.map(|s| sex_label(s).to_owned()),
            row.salary.map(format::pln),
            row.expected_retirement_income.map(format::pln),
            row.created_at.clone(),
        ];
        for cell in cells {
            let td = dom::create_element("td");
            td.set_text_content(Some(cell.as_deref().unwrap_or("---")));
            let _ = tr.append_child(&td);
        }
        let _ = tbody.append_child(&tr);
    }
}

fn sex_label(sex: Sex) -> &'static str {
    match sex {
        Sex::M => "Mężczyzna",
        Sex::F => "Kobieta",
        Sex::X => "Inna",
    }
}
