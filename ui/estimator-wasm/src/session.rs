//! Browser adapter around [`ret_session::Session`].
//!
//! The session lives in `RefCell`-wrapped `thread_local!` storage (WASM is
//! single-threaded) backed by localStorage, with `Date.now()` as the clock.
//! A background interval proactively refreshes tokens nearing expiry so an
//! authenticated page rarely hits a mid-request 401.

use crate::api::{self, ApiError};
use gloo_console::warn;
use gloo_timers::callback::{Interval, Timeout};
use ret_api_types::{RefreshRequest, TokenRequest, UserInfo};
use ret_session::{REFRESH_CHECK_INTERVAL_MS, Session, TokenStore};
use std::cell::RefCell;

/// localStorage-backed [`TokenStore`].
pub struct LocalStore;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl TokenStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(s) = storage() {
            let _ = s.set_item(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(s) = storage() {
            let _ = s.remove_item(key);
        }
    }
}

thread_local! {
    static SESSION: RefCell<Session<LocalStore>> = RefCell::new(Session::new(LocalStore));
}

pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&Session<LocalStore>) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Session<LocalStore>) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

// ── Predicates and accessors ──

pub fn is_authenticated() -> bool {
    with(|s| s.is_authenticated(now_ms()))
}

pub fn current_user() -> Option<UserInfo> {
    with(|s| s.current_user())
}

pub fn access_token() -> Option<String> {
    with(|s| s.access_token())
}

pub fn has_refresh_token() -> bool {
    with(|s| s.refresh_token().is_some())
}

/// Register a login observer. Callbacks fire while the session borrow is
/// held, so DOM work must be deferred — see [`deferred`].
pub fn on_login(callback: impl Fn() + 'static) {
    with_mut(|s| s.on_login(callback));
}

pub fn on_logout(callback: impl Fn() + 'static) {
    with_mut(|s| s.on_logout(callback));
}

/// Wrap an observer body so it runs on the next macrotask, outside the
/// session borrow.
pub fn deferred(body: fn()) -> impl Fn() + 'static {
    move || {
        Timeout::new(0, body).forget();
    }
}

// ── Flows ──

/// POST /token; on success persist the triple and identity. Stored state is
/// untouched when the call fails.
pub async fn login(username: &str, password: &str) -> Result<(), ApiError> {
    let tokens = api::post_token(&TokenRequest {
        username: username.to_owned(),
        password: password.to_owned(),
    })
    .await?;
    with_mut(|s| s.store_login(&tokens, username, now_ms()));
    Ok(())
}

/// Exchange the stored refresh token for a new pair. Any failure clears the
/// session and surfaces "session expired" upward.
pub async fn refresh() -> Result<(), ApiError> {
    let Some(refresh_token) = with(|s| s.refresh_token()) else {
        with_mut(|s| s.logout());
        return Err(ApiError::SessionExpired);
    };

    match api::post_refresh(&RefreshRequest { refresh_token }).await {
        Ok(tokens) => {
            with_mut(|s| s.apply_refresh(&tokens, now_ms()));
            Ok(())
        }
        Err(e) => {
            warn!("odświeżenie tokenu nie powiodło się:", e.to_string());
            with_mut(|s| s.logout());
            Err(ApiError::SessionExpired)
        }
    }
}

pub fn logout() {
    with_mut(|s| s.logout());
}

/// Start the background check: every 5 minutes, refresh proactively when
/// expiry is within the 10-minute window. Races with a 401-triggered
/// refresh are tolerated; the last stored triple wins.
pub fn start_refresh_timer() {
    Interval::new(REFRESH_CHECK_INTERVAL_MS, || {
        if is_authenticated() && with(|s| s.needs_refresh(now_ms())) {
            wasm_bindgen_futures::spawn_local(async {
                let _ = refresh().await;
            });
        }
    })
    .forget();
}
