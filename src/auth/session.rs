use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::{distributions::Alphanumeric, Rng};
use time::Duration;

use crate::config::SessionConfig;

const TOKEN_LEN: usize = 48;

/// Generates a fresh opaque session token.
pub fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// The cookie that hands `token` to the client.
pub fn session_cookie(cfg: &SessionConfig, token: &str) -> Cookie<'static> {
    Cookie::build((cfg.cookie_name.clone(), token.to_string()))
        .path("/")
        .max_age(Duration::seconds(cfg.max_age_seconds()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure)
        .build()
}

/// Response jar carrying a freshly issued session cookie.
pub fn issue(cfg: &SessionConfig, token: &str) -> CookieJar {
    CookieJar::new().add(session_cookie(cfg, token))
}

/// Reads the named session cookie; an empty value counts as missing.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
}
