//! GET /api/auth/me — the account behind the current session.

use axum::extract::State;
use axum::{Extension, Json};

use crate::model::{Claims, User};

use super::{ApiError, AuthApiState, ok_json};

/// Resolve the guard-injected claims back to the user record.
pub async fn me(
    State(state): State<AuthApiState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    ok_json(state.svc.user_for_claims(&claims))
}
