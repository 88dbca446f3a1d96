//! Calculator page controller.
//!
//! Thin DOM adapter around [`ret_wizard::Wizard`]: UI actions are
//! translated into transition calls, and the accordion is re-rendered from
//! whatever state the machine reports. All pension arithmetic happens on
//! the backend; this module only collects payloads and formats results.

use crate::api;
use crate::dom;
use crate::notify;
use ret_api_types::{IncomeRequest, PlanRequest, Sex, WorkBlock};
use ret_wizard::machine::default_rules;
use ret_wizard::{ForwardSummary, FormReader, Mode, ReverseSummary, Wizard, format};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlButtonElement, HtmlFormElement};

/// Standard ZUS pension contribution rate.
const CONTRIBUTION_RATE: f64 = 0.1952;

const RESULT_IDS: &[&str] = &[
    "actual-pension",
    "real-pension",
    "replacement-rate",
    "average-comparison",
    "goal-value",
    "funds-left",
    "monthly-savings",
];

thread_local! {
    static WIZARD: RefCell<Wizard> = RefCell::new(Wizard::new(Rc::new(default_rules())));
}

fn with_wizard<F, R>(f: F) -> R
where
    F: FnOnce(&mut Wizard) -> R,
{
    WIZARD.with(|w| f(&mut w.borrow_mut()))
}

// ── Elements ──

#[derive(Clone)]
struct Elements {
    mode_selection: web_sys::Element,
    stepper_form: HtmlFormElement,
    forward_btn: web_sys::HtmlElement,
    reverse_btn: web_sys::HtmlElement,
}

impl Elements {
    fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            mode_selection: dom::req_el("mode-selection")?,
            stepper_form: dom::req_form("stepper-form")?,
            forward_btn: dom::req_html("forward-mode-btn")?,
            reverse_btn: dom::req_html("reverse-mode-btn")?,
        })
    }
}

// ── Live form snapshot ──

struct DomForm;

impl FormReader for DomForm {
    fn value(&self, field: &str) -> String {
        match field {
            "sex" | "sex-rev" => dom::radio_value(field),
            "sick-leave" | "sick-leave-rev" => dom::checkbox_checked(field).to_string(),
            _ => dom::input_value_by_id(field),
        }
    }

    fn visible(&self, field: &str) -> bool {
        let el = match field {
            "sex" | "sex-rev" => dom::query(&format!("input[name=\"{field}\"]")),
            _ => dom::by_id(field),
        };
        el.map(|e| dom::is_visible(&e)).unwrap_or(false)
    }
}

// ── Init and event wiring ──

pub fn init() -> Result<(), JsValue> {
    let els = Elements::bind()?;

    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            select_mode(&els2, Mode::Forward);
        }) as Box<dyn FnMut(_)>);
        els.forward_btn
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            select_mode(&els2, Mode::Reverse);
        }) as Box<dyn FnMut(_)>);
        els.reverse_btn
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    for btn in dom::query_all(".next-btn") {
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| on_next())
            as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    for btn in dom::query_all(".prev-btn") {
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| on_prev())
            as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Accordion headers: direct navigation to previously reached steps.
    for header in dom::query_all(".step-header") {
        let header2 = header.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            if let Ok(Some(step)) = header2.closest(".accordion-step") {
                if let Some(index) = step
                    .get_attribute("data-step")
                    .and_then(|s| s.parse::<usize>().ok())
                {
                    on_jump(index);
                }
            }
        }) as Box<dyn FnMut(_)>);
        header.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    for id in ["start-over-btn", "start-over-btn-rev"] {
        if let Some(btn) = dom::by_id(id) {
            let els2 = els.clone();
            let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
                start_over(&els2);
            }) as Box<dyn FnMut(_)>);
            btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
    }

    {
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            wasm_bindgen_futures::spawn_local(on_submit());
        }) as Box<dyn FnMut(_)>);
        els.stepper_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    clear_results();
    Ok(())
}

// ── Transitions ──

fn select_mode(els: &Elements, mode: Mode) {
    dom::set_display(&els.mode_selection, "none");
    dom::set_display(&els.stepper_form, "block");

    for el in dom::query_all(".forward-step") {
        dom::set_display(&el, if mode == Mode::Forward { "block" } else { "none" });
    }
    for el in dom::query_all(".reverse-step") {
        dom::set_display(&el, if mode == Mode::Reverse { "block" } else { "none" });
    }

    with_wizard(|w| w.select_mode(mode));
    clear_field_errors();
    clear_results();
    notify::clear();
    update_steps();
}

fn on_next() {
    let outcome = with_wizard(|w| w.next(&DomForm));
    match outcome {
        Ok(()) => {
            clear_field_errors();
            update_steps();
        }
        Err(ret_wizard::Refusal::InvalidField { field, message }) => {
            mark_invalid(&field);
            notify::error(&message);
        }
        Err(_) => {}
    }
}

fn on_prev() {
    with_wizard(|w| w.prev());
    update_steps();
}

fn on_jump(index: usize) {
    if with_wizard(|w| w.jump_to(index)).is_ok() {
        update_steps();
    }
}

fn start_over(els: &Elements) {
    with_wizard(|w| w.start_over());
    els.stepper_form.reset();
    for step in dom::query_all(".accordion-step") {
        dom::remove_class(&step, "unlocked");
        dom::remove_class(&step, "active");
    }
    dom::set_display(&els.mode_selection, "block");
    dom::set_display(&els.stepper_form, "none");
    clear_field_errors();
    clear_results();
    notify::clear();
}

async fn on_submit() {
    let begun = with_wizard(|w| w.begin_submit(&DomForm));
    let mode = match begun {
        Ok(mode) => mode,
        Err(ret_wizard::Refusal::InvalidField { field, message }) => {
            mark_invalid(&field);
            notify::error(&message);
            return;
        }
        // In-flight or wrong step: controls are disabled anyway.
        Err(_) => return,
    };

    set_loading(true);
    notify::info("Obliczenia w toku... Proszę czekać.");

    let success = match mode {
        Mode::Forward => match api::calc_retirement_income(&collect_forward()).await {
            Ok(response) => {
                render_forward_results(&response);
                true
            }
            Err(e) => {
                notify::error(&format!("Błąd obliczenia emerytury: {e}"));
                false
            }
        },
        Mode::Reverse => match api::generate_retirement_plan(&collect_reverse()).await {
            Ok(response) => {
                render_reverse_results(&response);
                true
            }
            Err(e) => {
                notify::error(&format!("Błąd generowania planu: {e}"));
                false
            }
        },
    };

    // Cleanup runs on both outcomes: release the in-flight guard and
    // re-enable the controls it disabled.
    with_wizard(|w| w.complete_submit(success));
    update_steps();
    set_loading(false);
}

// ── Payload collection (defaults mirror the form's placeholder values) ──

fn parse_u32(id: &str, default: u32) -> u32 {
    dom::input_value_by_id(id).parse().unwrap_or(default)
}

fn parse_f64(id: &str, default: f64) -> f64 {
    dom::input_value_by_id(id).parse().unwrap_or(default)
}

fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

fn collect_forward() -> IncomeRequest {
    let age = parse_u32("age", 30);
    let sex = Sex::from_wire(&dom::radio_value("sex"));
    let salary = parse_f64("salary", 0.0);
    let start_year = dom::input_value_by_id("start-year")
        .parse()
        .unwrap_or_else(|_| current_year());
    let end_year: i32 = dom::input_value_by_id("end-year")
        .parse()
        .unwrap_or(start_year + 30);
    let work_years = end_year - start_year;

    let mut work_blocks = Vec::new();
    if salary > 0.0 && work_years > 0 {
        work_blocks.push(WorkBlock {
            years: work_years as u32,
            gross_income: salary,
            contribution_rate: CONTRIBUTION_RATE,
        });
    }

    IncomeRequest {
        age,
        sex,
        work_blocks,
    }
}

fn collect_reverse() -> PlanRequest {
    PlanRequest {
        age: parse_u32("age-rev", 30),
        sex: Sex::from_wire(&dom::radio_value("sex-rev")),
        expected_retirement_income: parse_f64("goal-income", 0.0),
        include_sick: dom::checkbox_checked("sick-leave-rev"),
        funds: parse_f64("current-savings", 0.0),
        start_year: current_year(),
        expected_retirement_age: parse_u32("retirement-age", 67),
    }
}

// ── Rendering ──

fn active_steps(mode: Mode) -> Vec<web_sys::Element> {
    dom::query_all(&format!(".accordion-step.{}-step", mode.as_str()))
}

fn update_steps() {
    let (mode, active, highest) =
        with_wizard(|w| (w.mode(), w.active_index(), w.highest_reached()));
    let Some(mode) = mode else {
        return;
    };
    for (index, step) in active_steps(mode).iter().enumerate() {
        dom::toggle_class(step, "active", Some(index) == active);
        dom::toggle_class(step, "unlocked", index <= highest);
    }
}

fn render_forward_results(response: &ret_api_types::IncomeResponse) {
    let summary = ForwardSummary::build(response, parse_f64("salary", 0.0));
    dom::set_text_by_id("actual-pension", &format::pln(summary.actual));
    dom::set_text_by_id("real-pension", &format::pln(summary.realistic));
    dom::set_text_by_id("replacement-rate", &format::percent(summary.replacement_rate));
    dom::set_text_by_id("average-comparison", summary.comparison_label());
    notify::success(&format!(
        "Obliczenia zakończone! Twoja przewidywana emerytura to {}.",
        format::pln(summary.realistic)
    ));
}

fn render_reverse_results(response: &ret_api_types::PlanResponse) {
    let summary = ReverseSummary::build(
        response,
        parse_u32("age-rev", 30),
        parse_u32("retirement-age", 67),
    );
    dom::set_text_by_id("goal-value", &format::pln(summary.expected_total_funds));
    dom::set_text_by_id("funds-left", &format::pln(summary.funds_left_to_collect));
    dom::set_text_by_id("monthly-savings", &format::pln(summary.monthly_needed));
    notify::success(&format!(
        "Plan emerytalny wygenerowany! Musisz oszczędzać {} miesięcznie.",
        format::pln(summary.monthly_needed)
    ));
}

fn clear_results() {
    for id in RESULT_IDS {
        dom::set_text_by_id(id, "---");
    }
}

fn set_loading(loading: bool) {
    for el in dom::query_all("button[type=\"submit\"], .next-btn") {
        if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
            btn.set_disabled(loading);
        }
    }
}

fn mark_invalid(field: &str) {
    let el = match field {
        "sex" | "sex-rev" => dom::query(&format!("input[name=\"{field}\"]")),
        _ => dom::by_id(field),
    };
    if let Some(el) = el {
        dom::add_class(&el, "error");
        dom::focus(&el);
    }
}

fn clear_field_errors() {
    for el in dom::query_all("#stepper-form .error") {
        dom::remove_class(&el, "error");
    }
}
