//! Auth session store.
//!
//! Holds the access/refresh token pair, its expiry, and the signed-in
//! identity in client-persisted key/value storage. The store is generic
//! over [`TokenStore`] and takes the current time as a parameter, so the
//! expiry arithmetic is testable against a simulated clock; the browser
//! layer supplies localStorage and `Date.now()`.
//!
//! Networking stays outside: the API client performs the token and refresh
//! requests and feeds the responses in through [`Session::store_login`] /
//! [`Session::apply_refresh`].

use ret_api_types::{TokenResponse, UserInfo};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const EXPIRES_AT_KEY: &str = "token_expires_at";
pub const USER_INFO_KEY: &str = "user_info";

/// Don't trust a token within 5 minutes of expiry; a request could race it.
pub const EXPIRY_BUFFER_MS: f64 = 5.0 * 60.0 * 1000.0;
/// Proactively refresh once expiry is less than 10 minutes away.
pub const REFRESH_WINDOW_MS: f64 = 10.0 * 60.0 * 1000.0;
/// How often the background timer re-checks remaining lifetime.
pub const REFRESH_CHECK_INTERVAL_MS: u32 = 5 * 60 * 1000;

/// Persistent key/value storage for the token triple.
pub trait TokenStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

type Observer = Box<dyn Fn()>;

pub struct Session<S: TokenStore> {
    store: S,
    login_observers: Vec<Observer>,
    logout_observers: Vec<Observer>,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Session<S> {
        Session {
            store,
            login_observers: Vec::new(),
            logout_observers: Vec::new(),
        }
    }

    // ── Observers ──

    pub fn on_login(&mut self, callback: impl Fn() + 'static) {
        self.login_observers.push(Box::new(callback));
    }

    pub fn on_logout(&mut self, callback: impl Fn() + 'static) {
        self.logout_observers.push(Box::new(callback));
    }

    // ── Predicates ──

    /// True iff a token exists and `now` is more than the safety buffer
    /// away from its expiry.
    pub fn is_authenticated(&self, now_ms: f64) -> bool {
        let Some(expires_at) = self.expires_at() else {
            return false;
        };
        self.store.get(ACCESS_TOKEN_KEY).is_some() && now_ms < expires_at - EXPIRY_BUFFER_MS
    }

    /// True iff the token is still alive but inside the proactive refresh
    /// window. Consulted by the background timer.
    pub fn needs_refresh(&self, now_ms: f64) -> bool {
        let Some(expires_at) = self.expires_at() else {
            return false;
        };
        let remaining = expires_at - now_ms;
        remaining > 0.0 && remaining < REFRESH_WINDOW_MS
    }

    // ── Accessors ──

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        let raw = self.store.get(USER_INFO_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    fn expires_at(&self) -> Option<f64> {
        self.store.get(EXPIRES_AT_KEY)?.parse().ok()
    }

    // ── Mutations ──

    /// Persist a fresh token pair plus identity after a successful login
    /// and notify login observers. Prior stored state is only touched on
    /// this success path; a failed login never reaches here.
    pub fn store_login(&mut self, tokens: &TokenResponse, username: &str, now_ms: f64) {
        self.write_tokens(tokens, now_ms);
        let identity = UserInfo {
            username: username.to_owned(),
        };
        if let Ok(raw) = serde_json::to_string(&identity) {
            self.store.set(USER_INFO_KEY, &raw);
        }
        for observer in &self.login_observers {
            observer();
        }
    }

    /// Replace the token triple after a refresh. Identity is unchanged.
    pub fn apply_refresh(&mut self, tokens: &TokenResponse, now_ms: f64) {
        self.write_tokens(tokens, now_ms);
    }

    /// Clear every stored field and notify logout observers.
    pub fn logout(&mut self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(EXPIRES_AT_KEY);
        self.store.remove(USER_INFO_KEY);
        for observer in &self.logout_observers {
            observer();
        }
    }

    fn write_tokens(&mut self, tokens: &TokenResponse, now_ms: f64) {
        let expires_at = now_ms + tokens.expires_in as f64 * 1000.0;
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token);
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token);
        self.store.set(EXPIRES_AT_KEY, &format!("{expires_at}"));
    }
}

/// In-memory store for tests and non-browser use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tokens(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "acc-1".to_owned(),
            refresh_token: "ref-1".to_owned(),
            expires_in,
        }
    }

    #[test]
    fn login_then_authenticated_while_clock_is_early() {
        let mut session = Session::new(MemoryStore::default());
        let t0 = 1_000_000.0;
        session.store_login(&tokens(3600), "jan@example.pl", t0);

        assert!(session.is_authenticated(t0));
        assert_eq!(
            session.current_user().unwrap().username,
            "jan@example.pl"
        );

        // Still fine just before the buffer...
        let buffer_edge = t0 + 3600.0 * 1000.0 - EXPIRY_BUFFER_MS;
        assert!(session.is_authenticated(buffer_edge - 1.0));
        // ...but not once the clock passes expiry - 5min.
        assert!(!session.is_authenticated(buffer_edge));
    }

    #[test]
    fn short_lived_token_is_never_authenticated() {
        let mut session = Session::new(MemoryStore::default());
        session.store_login(&tokens(300), "jan@example.pl", 0.0);
        // expires_in == 300 s is entirely inside the 5-minute buffer.
        assert!(!session.is_authenticated(0.0));
    }

    #[test]
    fn refresh_window_opens_ten_minutes_before_expiry() {
        let mut session = Session::new(MemoryStore::default());
        session.store_login(&tokens(3600), "jan@example.pl", 0.0);

        assert!(!session.needs_refresh(0.0));
        let inside_window = 3600.0 * 1000.0 - REFRESH_WINDOW_MS + 1.0;
        assert!(session.needs_refresh(inside_window));
        // Already expired: refresh is pointless, logout path applies.
        assert!(!session.needs_refresh(3600.0 * 1000.0 + 1.0));
    }

    #[test]
    fn apply_refresh_replaces_the_triple_but_keeps_identity() {
        let mut session = Session::new(MemoryStore::default());
        session.store_login(&tokens(600), "jan@example.pl", 0.0);

        let newer = TokenResponse {
            access_token: "acc-2".to_owned(),
            refresh_token: "ref-2".to_owned(),
            expires_in: 3600,
        };
        session.apply_refresh(&newer, 500_000.0);

        assert_eq!(session.access_token().as_deref(), Some("acc-2"));
        assert_eq!(session.refresh_token().as_deref(), Some("ref-2"));
        assert!(session.is_authenticated(500_000.0));
        assert_eq!(session.current_user().unwrap().username, "jan@example.pl");
    }

    #[test]
    fn logout_clears_everything_and_notifies_observers() {
        let mut session = Session::new(MemoryStore::default());
        let logged_out = Rc::new(Cell::new(0));
        let counter = logged_out.clone();
        session.on_logout(move || counter.set(counter.get() + 1));

        session.store_login(&tokens(3600), "jan@example.pl", 0.0);
        session.logout();

        assert_eq!(logged_out.get(), 1);
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated(0.0));
    }

    #[test]
    fn login_observers_fire_on_store_login() {
        let mut session = Session::new(MemoryStore::default());
        let seen = Rc::new(Cell::new(false));
        let flag = seen.clone();
        session.on_login(move || flag.set(true));

        session.store_login(&tokens(3600), "jan@example.pl", 0.0);
        assert!(seen.get());
    }
}
