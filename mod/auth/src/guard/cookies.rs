//! Cookie header helpers shared by the guard and the auth endpoints.

use std::collections::HashMap;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use cookie::{Cookie, SameSite};

/// Parse all request cookies into a name → value map.
///
/// Unparseable fragments are skipped; a broken cookie header must never
/// take a request down.
pub fn request_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for parsed in Cookie::split_parse(raw.to_owned()).flatten() {
            cookies.insert(parsed.name().to_string(), parsed.value().to_string());
        }
    }
    cookies
}

/// Build the `Set-Cookie` value for a session token.
///
/// HTTP-only and SameSite=Lax: the token is never readable from client
/// script, and cross-site POSTs don't carry it.
pub fn session_cookie(name: &str, token: &str, ttl_secs: i64) -> String {
    Cookie::build((name.to_owned(), token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(ttl_secs))
        .build()
        .to_string()
}

/// Build the `Set-Cookie` value that deletes a cookie: empty value,
/// already expired.
pub fn expired_cookie(name: &str) -> String {
    Cookie::build((name.to_owned(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_request_cookies_parses_multiple() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("customer_session=abc; cart=%5B%5D"),
        );

        let cookies = request_cookies(&headers);
        assert_eq!(cookies.get("customer_session").map(String::as_str), Some("abc"));
        assert_eq!(cookies.get("cart").map(String::as_str), Some("%5B%5D"));
    }

    #[test]
    fn test_request_cookies_skips_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("not a cookie;; a=1"));

        let cookies = request_cookies(&headers);
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("admin_session", "tok", 600);
        assert!(value.starts_with("admin_session=tok"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=600"));
        assert!(value.contains("Path=/"));
    }

    #[test]
    fn test_expired_cookie_clears() {
        let value = expired_cookie("admin_session");
        assert!(value.starts_with("admin_session=;"));
        assert!(value.contains("Max-Age=0"));
    }
}
