use serde::{Deserialize, Serialize};

use bistro_core::ServiceError;

/// Role of an authenticated identity.
///
/// Serialized in tokens and in the users table as `"ADMIN"` / `"USER"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

impl Role {
    /// The wire/database string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// Session token claims payload.
///
/// The guard proves these describe a real, unexpired token; it does NOT
/// prove the role is sufficient — endpoints re-check that themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,

    /// Email address of the identity.
    pub email: String,

    /// Role of the identity.
    pub role: Role,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Endpoint-level role check: ADMIN or a 403.
///
/// Kept separate from the guard on purpose — the guard authenticates,
/// each privileged endpoint authorizes.
pub fn require_admin(claims: &Claims) -> Result<(), ServiceError> {
    if claims.role != Role::Admin {
        return Err(ServiceError::PermissionDenied(
            "admin access required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        let r: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(r, Role::User);
    }

    #[test]
    fn test_require_admin() {
        let claims = Claims {
            sub: "u1".into(),
            email: "a@b.c".into(),
            role: Role::User,
            iat: 0,
            exp: 0,
        };
        assert!(require_admin(&claims).is_err());

        let claims = Claims {
            role: Role::Admin,
            ..claims
        };
        assert!(require_admin(&claims).is_ok());
    }
}
