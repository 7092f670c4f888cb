//! Like endpoints — bookmarks of the signed-in customer.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use auth::model::Claims;

use crate::model::Like;

use super::{ApiError, AppState, ok_json};

pub async fn like(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    svc.like_item(&claims.sub, &id).map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn unlike(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    svc.unlike_item(&claims.sub, &id).map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn list_likes(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Like>>, ApiError> {
    ok_json(svc.likes_for_user(&claims.sub))
}
