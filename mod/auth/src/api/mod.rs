mod login;
mod me;
mod signup;
mod users;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use bistro_core::ServiceError;

use crate::service::{AuthError, AuthService};

/// Shared state for the auth endpoints of one gateway.
#[derive(Clone)]
pub struct AuthApiState {
    pub svc: Arc<AuthService>,
    /// Session cookie name for this gateway.
    pub session_cookie: String,
    /// Login page path, used as the logout redirect target.
    pub login_path: String,
}

/// Customer Gateway auth routes: signup, login, me, logout.
pub fn customer_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup::signup))
        .route("/api/auth/login", post(login::login))
        .route("/api/auth/me", get(me::me))
        .route("/logout", get(login::logout))
        .with_state(state)
}

/// Admin Gateway auth routes: admin login, account listing, logout.
pub fn admin_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/auth", post(login::admin_login))
        .route("/api/users", get(users::list_users))
        .route("/logout", get(login::logout))
        .with_state(state)
}

/// Gateway API error body: `{"error": "<message>"}` with the status
/// taken from the service error taxonomy.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ServiceError::from(err).into()
    }
}

/// Wrap a service result into an API response.
pub(crate) fn ok_json<T: serde::Serialize>(
    result: Result<T, AuthError>,
) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use bistro_sql::SqliteStore;

    use super::*;
    use crate::model::{CreateUser, Role};
    use crate::service::AuthConfig;
    use crate::service::user::hash_password;

    fn test_state() -> AuthApiState {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let svc = AuthService::new(sql, AuthConfig::default()).unwrap();
        AuthApiState {
            svc,
            session_cookie: "admin_session".to_string(),
            login_path: "/login".to_string(),
        }
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_admin_login_statuses() {
        let state = test_state();
        state
            .svc
            .ensure_admin(
                "admin@example.com",
                "Admin",
                &hash_password("admin-password").unwrap(),
            )
            .unwrap();
        state
            .svc
            .create_user(
                CreateUser {
                    email: "user@example.com".into(),
                    name: "User".into(),
                    password: "user-password".into(),
                },
                Role::User,
            )
            .unwrap();
        let router = admin_router(state);

        // Missing fields → 400.
        let resp = router
            .clone()
            .oneshot(json_post("/auth", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());

        // Bad credentials → 401.
        let resp = router
            .clone()
            .oneshot(json_post(
                "/auth",
                serde_json::json!({"email": "admin@example.com", "password": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Valid USER credentials on the admin login → 403.
        let resp = router
            .clone()
            .oneshot(json_post(
                "/auth",
                serde_json::json!({"email": "user@example.com", "password": "user-password"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Success → session cookie + {"success": true}.
        let resp = router
            .oneshot(json_post(
                "/auth",
                serde_json::json!({"email": "admin@example.com", "password": "admin-password"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("admin_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));
        assert_eq!(body_json(resp).await, serde_json::json!({"success": true}));
    }

    #[tokio::test]
    async fn test_signup_and_duplicate() {
        let state = test_state();
        let router = customer_router(state);

        let resp = router
            .clone()
            .oneshot(json_post(
                "/api/auth/signup",
                serde_json::json!({
                    "email": "alice@example.com",
                    "name": "Alice",
                    "password": "hunter2hunter2"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["email"], "alice@example.com");
        assert!(body.get("password_hash").is_none());

        let resp = router
            .oneshot(json_post(
                "/api/auth/signup",
                serde_json::json!({
                    "email": "alice@example.com",
                    "name": "Alice Again",
                    "password": "hunter2hunter2"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_logout_clears_cookies_and_redirects() {
        let router = admin_router(test_state());
        let resp = router
            .oneshot(
                Request::builder()
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        let cleared: Vec<&str> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert!(cleared.iter().any(|c| c.starts_with("admin_session=;")));
    }
}
