//! HTTP API client for the retirement backend.
//!
//! Wraps `fetch` for JSON requests, attaches the bearer token from the
//! session store, and on a 401 performs exactly one refresh-and-retry cycle
//! before surfacing the outcome. The token endpoints themselves bypass that
//! cycle so a rejected refresh can never recurse.

use crate::dom;
use crate::session;
use ret_api_types::{
    IncomeRequest, IncomeResponse, PlanRequest, PlanResponse, RefreshRequest, ReportRow,
    TokenRequest, TokenResponse,
};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

pub const TOKEN_ENDPOINT: &str = "/token";
pub const REFRESH_ENDPOINT: &str = "/refresh_token";

/// Failure taxonomy for everything that leaves the page.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// fetch-level failure, no response arrived.
    #[error("Problem z połączeniem z serwerem: {0}")]
    Network(String),
    /// Non-2xx response; `detail` is the server payload when parseable,
    /// else the HTTP status text.
    #[error("{detail}")]
    Server { status: u16, detail: String },
    /// Refresh failed after a 401; the session has been cleared.
    #[error("Sesja wygasła. Zaloguj się ponownie.")]
    SessionExpired,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Determine the API base URL.
///
/// Priority: user-supplied `#baseUrl` input → `data-api-base` on `<body>` →
/// same-origin port 8000.
pub fn base_url() -> String {
    if let Some(input) = dom::by_id_typed::<web_sys::HtmlInputElement>("baseUrl") {
        let v = input.value().trim().to_string();
        if !v.is_empty() {
            return v.trim_end_matches('/').to_string();
        }
    }

    if let Some(body) = dom::document().body() {
        if let Some(base) = body.get_attribute("data-api-base") {
            let base = base.trim();
            if !base.is_empty() {
                return base.trim_end_matches('/').to_string();
            }
        }
    }

    let loc = dom::window().location();
    let host = loc.hostname().unwrap_or_default();
    let protocol = loc.protocol().unwrap_or_else(|_| "http:".into());
    format!("{protocol}//{host}:8000")
}

/// Whether a 401 response warrants a refresh-and-retry cycle. The token
/// endpoints are exempt, a missing refresh token makes retrying pointless,
/// and at most one cycle runs per request.
fn refresh_on_401(path: &str, has_refresh_token: bool, already_retried: bool) -> bool {
    has_refresh_token
        && !already_retried
        && path != TOKEN_ENDPOINT
        && path != REFRESH_ENDPOINT
}

struct RawResponse {
    status: u16,
    status_text: String,
    body: String,
}

async fn fetch_raw(
    path: &str,
    method: &str,
    body: Option<&str>,
    bearer: Option<&str>,
) -> Result<RawResponse, ApiError> {
    let url = format!("{}{}", base_url(), path);

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);

    let headers = Headers::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    if let Some(token) = bearer {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    }
    if let Some(b) = body {
        opts.set_body(&JsValue::from_str(b));
    }
    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp_value = JsFuture::from(dom::window().fetch_with_request(&request))
        .await
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| ApiError::Network("response is not a Response".into()))?;

    let text_promise = resp
        .text()
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    Ok(RawResponse {
        status: resp.status(),
        status_text: resp.status_text(),
        body: text.as_string().unwrap_or_default(),
    })
}

fn server_error(raw: &RawResponse) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(&raw.body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| format!("HTTP {}: {}", raw.status, raw.status_text));
    ApiError::Server {
        status: raw.status,
        detail,
    }
}

/// Perform an authenticated JSON request with the single-refresh 401 policy.
pub async fn request(
    path: &str,
    method: &str,
    body: Option<String>,
) -> Result<serde_json::Value, ApiError> {
    let mut retried = false;
    loop {
        let bearer = session::access_token();
        let raw = fetch_raw(path, method, body.as_deref(), bearer.as_deref()).await?;

        if raw.status == 401 && refresh_on_401(path, session::has_refresh_token(), retried) {
            retried = true;
            // The retry waits for the refresh to resolve; a failed refresh
            // already logged the session out.
            if session::refresh().await.is_err() {
                return Err(ApiError::SessionExpired);
            }
            continue;
        }

        if !(200..300).contains(&raw.status) {
            return Err(server_error(&raw));
        }

        if raw.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        return serde_json::from_str(&raw.body)
            .map_err(|e| ApiError::Network(format!("niepoprawna odpowiedź JSON: {e}")));
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Network(format!("niepoprawna odpowiedź JSON: {e}")))
}

// ── Token endpoints (no bearer, no retry cycle) ──

pub async fn post_token(req: &TokenRequest) -> Result<TokenResponse, ApiError> {
    let body = serde_json::to_string(req).map_err(|e| ApiError::Network(e.to_string()))?;
    let raw = fetch_raw(TOKEN_ENDPOINT, "POST", Some(&body), None).await?;
    if !(200..300).contains(&raw.status) {
        return Err(server_error(&raw));
    }
    serde_json::from_str(&raw.body)
        .map_err(|e| ApiError::Network(format!("niepoprawna odpowiedź JSON: {e}")))
}

pub async fn post_refresh(req: &RefreshRequest) -> Result<TokenResponse, ApiError> {
    let body = serde_json::to_string(req).map_err(|e| ApiError::Network(e.to_string()))?;
    let raw = fetch_raw(REFRESH_ENDPOINT, "POST", Some(&body), None).await?;
    if !(200..300).contains(&raw.status) {
        return Err(server_error(&raw));
    }
    serde_json::from_str(&raw.body)
        .map_err(|e| ApiError::Network(format!("niepoprawna odpowiedź JSON: {e}")))
}

// ── Calculation and reporting endpoints ──

pub async fn calc_retirement_income(req: &IncomeRequest) -> Result<IncomeResponse, ApiError> {
    let body = serde_json::to_string(req).map_err(|e| ApiError::Network(e.to_string()))?;
    decode(request("/calc_retirement_income", "POST", Some(body)).await?)
}

pub async fn generate_retirement_plan(req: &PlanRequest) -> Result<PlanResponse, ApiError> {
    let body = serde_json::to_string(req).map_err(|e| ApiError::Network(e.to_string()))?;
    decode(request("/generate_retirement_plan", "POST", Some(body)).await?)
}

pub async fn get_reports() -> Result<Vec<ReportRow>, ApiError> {
    decode(request("/reports", "GET", None).await?)
}

pub async fn health_check() -> Result<serde_json::Value, ApiError> {
    request("/", "GET", None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_runs_at_most_once_per_request() {
        assert!(refresh_on_401("/calc_retirement_income", true, false));
        assert!(!refresh_on_401("/calc_retirement_income", true, true));
    }

    #[test]
    fn token_endpoints_never_trigger_refresh() {
        assert!(!refresh_on_401(TOKEN_ENDPOINT, true, false));
        assert!(!refresh_on_401(REFRESH_ENDPOINT, true, false));
    }

    #[test]
    fn refresh_requires_a_stored_refresh_token() {
        assert!(!refresh_on_401("/reports", false, false));
    }
}
