//! POST /api/auth/signup — customer account creation.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::model::{CreateUser, Role};

use super::{ApiError, AuthApiState};

/// Create a USER account. Validation failures are 400, a duplicate
/// email is 409.
pub async fn signup(
    State(state): State<AuthApiState>,
    Json(body): Json<CreateUser>,
) -> Response {
    match state.svc.create_user(body, Role::User) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
