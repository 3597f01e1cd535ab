//! `auth` cookie helpers shared by the guard and the session bridge.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

pub const AUTH_COOKIE_NAME: &str = "auth";

/// Read the `auth` cookie from every `Cookie` header.
///
/// Empty or whitespace-only values count as absent.
#[must_use]
pub fn read_auth_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == AUTH_COOKIE_NAME).then(|| val.trim().to_string())
        })
        .find(|val| !val.is_empty())
}

/// `Set-Cookie` value that removes the `auth` cookie from the browser.
///
/// # Errors
///
/// Never in practice; the value is built from static parts.
pub fn clear_auth_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{AUTH_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
