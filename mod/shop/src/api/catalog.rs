//! Catalog endpoints — menu browsing for customers, CRUD for admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use auth::model::{Claims, require_admin};

use crate::model::{CategoryWithItems, CreateItem, Item};

use super::{ApiError, AppState, ok_json};

// ── Customer-facing ──

pub async fn list_categories(
    State(svc): State<AppState>,
) -> Result<Json<Vec<CategoryWithItems>>, ApiError> {
    ok_json(svc.list_categories())
}

pub async fn get_item(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    ok_json(svc.get_item(&id))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub async fn search(
    State(svc): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    ok_json(svc.search_items(&query.q))
}

// ── Admin ──

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    name: String,
}

pub async fn list_categories_admin(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<CategoryWithItems>>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.list_categories())
}

pub async fn create_category(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CategoryRequest>,
) -> Response {
    if let Err(e) = require_admin(&claims) {
        return ApiError::from(e).into_response();
    }
    match svc.create_category(&body.name) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn edit_category(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<crate::model::Category>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.rename_category(&id, &body.name))
}

pub async fn delete_category(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims)?;
    svc.delete_category(&id).map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn create_item(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateItem>,
) -> Response {
    if let Err(e) = require_admin(&claims) {
        return ApiError::from(e).into_response();
    }
    match svc.create_item(body) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn edit_item(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateItem>,
) -> Result<Json<Item>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.update_item(&id, body))
}

pub async fn get_item_admin(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Item>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.get_item(&id))
}

pub async fn delete_item(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims)?;
    svc.delete_item(&id).map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({ "success": true })))
}
