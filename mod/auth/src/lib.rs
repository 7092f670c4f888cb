//! Auth module — user accounts, signed session tokens, and the access guard.
//!
//! # Resources
//!
//! - **User** — credential-based identity with an ADMIN or USER role
//! - **Claims** — the identity/role assertion carried by a session token
//! - **SessionCodec** — HS256 issue/verify of self-contained session tokens
//! - **Guard** — per-request public/protected classification + credential
//!   validation, mounted as middleware by each gateway binary
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let router = module.customer_routes("/login");
//! ```
//!
//! Sessions are stateless: the server keeps no session table, so a token
//! stays valid until its expiry even after logout. The short TTL bounds
//! that window.

pub mod api;
pub mod guard;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use crate::api::AuthApiState;
use crate::service::{AuthConfig, AuthService};

/// Cookie names used by the two gateways.
pub const ADMIN_SESSION_COOKIE: &str = "admin_session";
pub const CUSTOMER_SESSION_COOKIE: &str = "customer_session";
pub const PROVIDER_TOKEN_COOKIE: &str = "provider_token";

/// Auth module. Holds the AuthService and provides the HTTP routes each
/// gateway mounts.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule over an injected store handle.
    pub fn new(
        sql: Arc<dyn bistro_sql::SqlStore>,
        config: AuthConfig,
    ) -> Result<Self, bistro_core::ServiceError> {
        let service = AuthService::new(sql, config).map_err(bistro_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Routes for the Customer Gateway: signup, login, me, logout.
    pub fn customer_routes(&self, login_path: &str) -> Router {
        api::customer_router(AuthApiState {
            svc: self.service.clone(),
            session_cookie: CUSTOMER_SESSION_COOKIE.to_string(),
            login_path: login_path.to_string(),
        })
    }

    /// Routes for the Admin Gateway: admin login, logout.
    pub fn admin_routes(&self, login_path: &str) -> Router {
        api::admin_router(AuthApiState {
            svc: self.service.clone(),
            session_cookie: ADMIN_SESSION_COOKIE.to_string(),
            login_path: login_path.to_string(),
        })
    }
}
