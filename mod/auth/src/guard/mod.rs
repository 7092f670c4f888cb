//! Access Guard — per-request public/protected classification plus
//! credential validation.
//!
//! The guard runs before every endpoint. Public paths pass through
//! untouched. Protected paths must present a credential one of the
//! configured verifiers accepts; on success the claims are stored in
//! request extensions for handlers to read. On failure, API paths get a
//! JSON 401 and page paths get a redirect to the login page carrying the
//! originally requested path, with any stale auth cookies cleared.
//!
//! The guard proves identity only. Role checks are re-done per endpoint.

mod cookies;
mod verifier;

pub use cookies::{expired_cookie, request_cookies, session_cookie};
pub use verifier::{CredentialVerifier, ProviderTokenVerifier, SessionCookieVerifier};

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{HeaderValue, LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::model::Claims;
use crate::service::token::Rejected;

/// Per-gateway guard configuration.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Exact paths that never require authentication (e.g. `/`).
    pub public_paths: Vec<String>,

    /// Path prefixes that never require authentication.
    pub public_prefixes: Vec<String>,

    /// Login page path used as the redirect target on rejection.
    pub login_path: String,

    /// Paths under this prefix answer rejection with JSON 401 instead
    /// of a redirect.
    pub api_prefix: String,

    /// Auth cookies to clear (when present) on rejection.
    pub clear_cookies: Vec<String>,
}

/// The guard: a classification rule plus an ordered credential
/// verifier chain.
pub struct Guard {
    config: GuardConfig,
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
}

impl Guard {
    pub fn new(config: GuardConfig, verifiers: Vec<Arc<dyn CredentialVerifier>>) -> Arc<Self> {
        Arc::new(Self { config, verifiers })
    }

    /// Check if a path is public (no auth required).
    fn is_public(&self, path: &str) -> bool {
        self.config.public_paths.iter().any(|p| p == path)
            || self
                .config
                .public_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Run the verifier chain in priority order, short-circuiting on the
    /// first that validates.
    ///
    /// The reported rejection is the first concrete failure (bad
    /// signature, expiry, malformed) if any verifier saw a credential,
    /// `Missing` when none was presented at all.
    fn authenticate(&self, cookies: &HashMap<String, String>) -> Result<Claims, Rejected> {
        let mut rejection = Rejected::Missing;
        for verifier in &self.verifiers {
            match verifier.verify(cookies) {
                Ok(claims) => return Ok(claims),
                Err(reason) => {
                    debug!(scheme = verifier.scheme(), %reason, "credential rejected");
                    if rejection == Rejected::Missing {
                        rejection = reason;
                    }
                }
            }
        }
        Err(rejection)
    }

    /// Build the rejection response for a path.
    fn deny(&self, path: &str, cookies: &HashMap<String, String>, reason: Rejected) -> Response {
        let mut response = if path.starts_with(self.config.api_prefix.as_str()) {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": reason.to_string() })),
            )
                .into_response()
        } else {
            let location = format!("{}?from={}", self.config.login_path, path);
            let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(LOCATION, value);
            }
            response
        };

        // Clear whatever stale auth cookies the client sent, so a broken
        // cookie doesn't produce a redirect loop after the next login.
        for name in &self.config.clear_cookies {
            if cookies.contains_key(name) {
                if let Ok(value) = HeaderValue::from_str(&expired_cookie(name)) {
                    response.headers_mut().append(SET_COOKIE, value);
                }
            }
        }

        response
    }
}

/// Middleware entry point. Mount with
/// `axum::middleware::from_fn_with_state(guard, access_guard)`.
pub async fn access_guard(
    State(guard): State<Arc<Guard>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if guard.is_public(&path) {
        return next.run(request).await;
    }

    let cookies = request_cookies(request.headers());

    match guard.authenticate(&cookies) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(reason) => {
            debug!(%path, %reason, "request denied");
            guard.deny(&path, &cookies, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::{get, post};
    use axum::{Extension, Json, Router, middleware};
    use tower::ServiceExt;

    use super::*;
    use crate::model::Role;
    use crate::service::token::SessionCodec;

    const SESSION_COOKIE: &str = "customer_session";

    fn codec() -> Arc<SessionCodec> {
        Arc::new(SessionCodec::new("guard-test-secret"))
    }

    fn test_router(codec: Arc<SessionCodec>) -> Router {
        let guard = Guard::new(
            GuardConfig {
                public_paths: vec!["/".into()],
                public_prefixes: vec!["/login".into(), "/health".into()],
                login_path: "/login".into(),
                api_prefix: "/api".into(),
                clear_cookies: vec![SESSION_COOKIE.into(), "provider_token".into()],
            },
            vec![Arc::new(SessionCookieVerifier::new(codec, SESSION_COOKIE))],
        );

        Router::new()
            .route("/login", get(|| async { "login page" }))
            .route("/checkout", get(whoami))
            .route("/api/payment", post(|| async { "paid" }))
            .layer(middleware::from_fn_with_state(guard, access_guard))
    }

    async fn whoami(Extension(claims): Extension<Claims>) -> Json<Claims> {
        Json(claims)
    }

    #[tokio::test]
    async fn test_protected_page_redirects_with_from_param() {
        let router = test_router(codec());
        let req = Request::builder()
            .uri("/checkout")
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?from=/checkout"
        );
    }

    #[tokio::test]
    async fn test_public_path_passes_through() {
        let router = test_router(codec());
        let req = Request::builder()
            .uri("/login")
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_api_path_gets_json_401() {
        let router = test_router(codec());
        let req = Request::builder()
            .method("POST")
            .uri("/api/payment")
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_valid_session_cookie_passes_and_injects_claims() {
        let codec = codec();
        let token = codec.issue("u1", "alice@example.com", Role::User, 600).unwrap();
        let router = test_router(codec);

        let req = Request::builder()
            .uri("/checkout")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let claims: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(claims["sub"], "u1");
        assert_eq!(claims["role"], "USER");
    }

    #[tokio::test]
    async fn test_invalid_cookie_is_cleared_on_rejection() {
        let router = test_router(codec());
        let req = Request::builder()
            .uri("/checkout")
            .header(header::COOKIE, format!("{}=garbage-token", SESSION_COOKIE))
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

        let cleared: Vec<&str> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cleared.len(), 1);
        assert!(cleared[0].starts_with(&format!("{}=;", SESSION_COOKIE)));
        assert!(cleared[0].contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_expired_session_redirects() {
        let codec = codec();
        let token = codec.issue("u1", "alice@example.com", Role::User, -5).unwrap();
        let router = test_router(codec);

        let req = Request::builder()
            .uri("/checkout")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
