//! Cookie builder for the session token.
//!
//! One HTTP-only, SameSite=Lax cookie carries the signed session token; its
//! Max-Age mirrors the configured session max age so cookie and session expire
//! together. Logout clears it by setting Max-Age to 0.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the session token.
pub const HANDIN_SESSION_TOKEN: &str = "handin_session_token";

/// Set the session-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use handin_auth_types::cookie::{set_session_cookie, HANDIN_SESSION_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "handin.example".to_string(), 604800);
/// let cookie = jar.get(HANDIN_SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("handin.example"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    max_age_secs: u64,
) -> CookieJar {
    let cookie = Cookie::build((HANDIN_SESSION_TOKEN, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(max_age_secs as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session-token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use handin_auth_types::cookie::{
///     clear_session_cookie, set_session_cookie, HANDIN_SESSION_TOKEN,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "t".to_string(), "handin.example".to_string(), 604800);
/// let jar = clear_session_cookie(jar, "handin.example".to_string());
/// let cookie = jar.get(HANDIN_SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((HANDIN_SESSION_TOKEN, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
