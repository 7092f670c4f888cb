use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher as _, SaltString};
use password_hash::{PasswordHash, PasswordVerifier};

use bistro_core::{ListParams, ListResult, new_id, now_rfc3339};
use bistro_sql::Value;

use crate::model::{Claims, CreateUser, Role, User};
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Create a user account with the given role.
    ///
    /// Validates the input, hashes the password with argon2id, and
    /// inserts the record. A duplicate email surfaces as `Conflict`.
    pub fn create_user(&self, input: CreateUser, role: Role) -> Result<User, AuthError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("a valid email is required".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("name must not be empty".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let user = User {
            id: new_id(),
            email: email.clone(),
            name: input.name.trim().to_string(),
            role,
            created_at: now_rfc3339(),
        };

        self.insert_record(
            "users",
            &user.id,
            &user,
            &[
                ("email", Value::Text(email)),
                ("role", Value::Text(role.as_str().to_string())),
                ("password_hash", Value::Text(password_hash)),
                ("created_at", Value::Text(user.created_at.clone())),
            ],
        )
        .map_err(|e| match e {
            AuthError::Conflict(_) => AuthError::Conflict("email is already registered".into()),
            other => other,
        })?;

        Ok(user)
    }

    /// Check a login attempt against the stored hash.
    ///
    /// Unknown email and wrong password produce the same error, so the
    /// response does not reveal which one it was.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let rows = self
            .sql
            .query(
                "SELECT data, password_hash FROM users WHERE email = ?1",
                &[Value::Text(email)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AuthError::Unauthorized("invalid credentials".into()))?;

        let hash = row
            .get_str("password_hash")
            .ok_or_else(|| AuthError::Internal("missing password_hash column".into()))?;

        if !verify_password(password, hash) {
            return Err(AuthError::Unauthorized("invalid credentials".into()));
        }

        let data = row
            .get_str("data")
            .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Issue a session token for a user, using the configured TTL.
    pub fn issue_session(&self, user: &User) -> Result<String, AuthError> {
        self.codec()
            .issue(&user.id, &user.email, user.role, self.session_ttl_secs())
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.get_record("users", id)
    }

    /// List users, newest first.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let limit = params.limit.min(500);
        let (items, total) = self.list_records("users", limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    /// Ensure an admin account exists, creating it from a precomputed
    /// argon2id hash if missing. Called by the Admin Gateway at startup.
    pub fn ensure_admin(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let rows = self
            .sql
            .query(
                "SELECT id FROM users WHERE email = ?1",
                &[Value::Text(email.clone())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        if !rows.is_empty() {
            return Ok(());
        }

        let user = User {
            id: new_id(),
            email: email.clone(),
            name: name.to_string(),
            role: Role::Admin,
            created_at: now_rfc3339(),
        };

        self.insert_record(
            "users",
            &user.id,
            &user,
            &[
                ("email", Value::Text(email)),
                ("role", Value::Text(Role::Admin.as_str().to_string())),
                ("password_hash", Value::Text(password_hash.to_string())),
                ("created_at", Value::Text(user.created_at.clone())),
            ],
        )?;

        tracing::info!(email = %user.email, "created bootstrap admin account");
        Ok(())
    }

    /// Resolve the claims of a session token back to the user record.
    pub fn user_for_claims(&self, claims: &Claims) -> Result<User, AuthError> {
        self.get_user(&claims.sub)
    }
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hash failed: {}", e)))
}

/// Verify a password attempt against a stored argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bistro_sql::SqliteStore;

    use super::*;
    use crate::service::AuthConfig;

    fn test_service() -> Arc<AuthService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn signup(svc: &AuthService, email: &str) -> User {
        svc.create_user(
            CreateUser {
                email: email.to_string(),
                name: "Alice".to_string(),
                password: "hunter2hunter2".to_string(),
            },
            Role::User,
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_verify_credentials() {
        let svc = test_service();
        let user = signup(&svc, "alice@example.com");
        assert_eq!(user.role, Role::User);

        let found = svc
            .verify_credentials("alice@example.com", "hunter2hunter2")
            .unwrap();
        assert_eq!(found.id, user.id);

        let wrong = svc.verify_credentials("alice@example.com", "wrong-password");
        assert!(matches!(wrong, Err(AuthError::Unauthorized(_))));

        let unknown = svc.verify_credentials("nobody@example.com", "hunter2hunter2");
        assert!(matches!(unknown, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let svc = test_service();
        signup(&svc, "alice@example.com");

        let dup = svc.create_user(
            CreateUser {
                email: "alice@example.com".to_string(),
                name: "Other".to_string(),
                password: "another-password".to_string(),
            },
            Role::User,
        );
        assert!(matches!(dup, Err(AuthError::Conflict(_))));

        // The original row is unchanged.
        let found = svc
            .verify_credentials("alice@example.com", "hunter2hunter2")
            .unwrap();
        assert_eq!(found.name, "Alice");
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let svc = test_service();

        let no_at = svc.create_user(
            CreateUser {
                email: "not-an-email".into(),
                name: "A".into(),
                password: "long-enough".into(),
            },
            Role::User,
        );
        assert!(matches!(no_at, Err(AuthError::Validation(_))));

        let short_pw = svc.create_user(
            CreateUser {
                email: "a@b.c".into(),
                name: "A".into(),
                password: "short".into(),
            },
            Role::User,
        );
        assert!(matches!(short_pw, Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_session_issue_and_verify() {
        let svc = test_service();
        let user = signup(&svc, "alice@example.com");

        let token = svc.issue_session(&user).unwrap();
        let claims = svc.codec().verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn test_ensure_admin_is_idempotent() {
        let svc = test_service();
        let hash = hash_password("admin-password").unwrap();

        svc.ensure_admin("admin@example.com", "Root", &hash).unwrap();
        svc.ensure_admin("admin@example.com", "Root", &hash).unwrap();

        let admin = svc
            .verify_credentials("admin@example.com", "admin-password")
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
