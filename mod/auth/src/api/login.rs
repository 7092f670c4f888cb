//! Login and logout — credential check, session cookie issue/clear.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{HeaderValue, LOCATION, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::PROVIDER_TOKEN_COOKIE;
use crate::guard::{expired_cookie, session_cookie};
use crate::model::{Role, User};
use crate::service::AuthError;

use super::{ApiError, AuthApiState};

/// Login request body. Fields default to empty so a missing field is a
/// 400, not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Handle POST /api/auth/login (Customer Gateway).
pub async fn login(
    State(state): State<AuthApiState>,
    Json(body): Json<LoginRequest>,
) -> Response {
    match check_credentials(&state, &body) {
        Ok(user) => session_response(&state, &user),
        Err(e) => e.into_response(),
    }
}

/// Handle POST /auth (Admin Gateway).
///
/// Same credential check, plus the role gate: a valid USER identity on
/// the admin login is a 403, not a 401.
pub async fn admin_login(
    State(state): State<AuthApiState>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let user = match check_credentials(&state, &body) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    if user.role != Role::Admin {
        return ApiError::from(AuthError::Forbidden("admin access required".into()))
            .into_response();
    }

    session_response(&state, &user)
}

/// Handle GET /logout.
///
/// Stateless tokens cannot be revoked server-side; logout clears the
/// client-held cookies and redirects to the login page. An already
/// issued token stays valid until its TTL elapses.
pub async fn logout(State(state): State<AuthApiState>) -> Response {
    let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
    if let Ok(value) = HeaderValue::from_str(&state.login_path) {
        response.headers_mut().insert(LOCATION, value);
    }
    for cleared in [
        expired_cookie(&state.session_cookie),
        expired_cookie(PROVIDER_TOKEN_COOKIE),
    ] {
        if let Ok(value) = HeaderValue::from_str(&cleared) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

fn check_credentials(state: &AuthApiState, body: &LoginRequest) -> Result<User, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::from(AuthError::Validation(
            "missing 'email' and 'password' fields".into(),
        )));
    }

    state
        .svc
        .verify_credentials(&body.email, &body.password)
        .map_err(ApiError::from)
}

fn session_response(state: &AuthApiState, user: &User) -> Response {
    let token = match state.svc.issue_session(user) {
        Ok(token) => token,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let cookie = session_cookie(
        &state.session_cookie,
        &token,
        state.svc.session_ttl_secs(),
    );

    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true })),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}
