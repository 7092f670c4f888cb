//! Admin order listings.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use auth::model::{Claims, require_admin};
use bistro_core::{ListParams, ListResult};

use crate::model::Order;

use super::{ApiError, AppState, ok_json};

pub async fn list_orders(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ListResult<Order>>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.list_orders(&params))
}

pub async fn get_order(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Order>, ApiError> {
    require_admin(&claims)?;
    ok_json(svc.get_order(&id))
}
