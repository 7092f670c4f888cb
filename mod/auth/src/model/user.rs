use serde::{Deserialize, Serialize};

use crate::model::Role;

/// A user identity with credential-based login.
///
/// The password hash is stored in its own column and never appears in
/// the serialized record, so a `User` is safe to return from handlers
/// as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Email address. Unique across users, used as the login name.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Role fixed at creation time.
    pub role: Role,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for creating a new user. Fields default to empty so a missing
/// field surfaces as a validation error, not a deserialization one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}
