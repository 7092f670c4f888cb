//! GET /api/users — admin listing of accounts.

use axum::extract::{Query, State};
use axum::{Extension, Json};

use bistro_core::{ListParams, ListResult};

use crate::model::{Claims, User, require_admin};

use super::{ApiError, AuthApiState, ok_json};

pub async fn list_users(
    State(state): State<AuthApiState>,
    Query(params): Query<ListParams>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ListResult<User>>, ApiError> {
    require_admin(&claims)?;
    ok_json(state.svc.list_users(&params))
}
