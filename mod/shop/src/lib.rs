//! Shop module — the menu catalog, cart, checkout, and likes.
//!
//! # Resources
//!
//! - **Category** — a menu section holding items
//! - **Item** — one orderable product with a price in cents
//! - **Cart** — cookie-held ordered line items (see [`cart`])
//! - **Order** — an immutable purchase snapshot created at checkout
//! - **Like** — a customer's bookmark on an item
//!
//! The cart never touches the store: it lives in a client cookie and is
//! re-priced from the catalog at checkout.

pub mod api;
pub mod cart;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use crate::service::ShopService;

/// Shop module. Holds the ShopService and provides the HTTP routes each
/// gateway mounts.
pub struct ShopModule {
    service: Arc<ShopService>,
}

impl ShopModule {
    /// Create a new ShopModule over an injected store handle.
    pub fn new(sql: Arc<dyn bistro_sql::SqlStore>) -> Result<Self, bistro_core::ServiceError> {
        let service = ShopService::new(sql).map_err(bistro_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying ShopService.
    pub fn service(&self) -> &Arc<ShopService> {
        &self.service
    }

    /// Routes for the Customer Gateway: browse, search, cart, payment, likes.
    pub fn customer_routes(&self) -> Router {
        api::customer_router(self.service.clone())
    }

    /// Routes for the Admin Gateway: catalog CRUD and order listings.
    pub fn admin_routes(&self) -> Router {
        api::admin_router(self.service.clone())
    }
}
