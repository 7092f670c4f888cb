//! Bootstrap — first-start checks and admin account creation.
//!
//! When the Admin Gateway starts:
//! 1. Verify the config describes a usable admin account — if not,
//!    refuse to start.
//! 2. Ensure that account exists in the database.

use auth::service::AuthService;
use auth::service::user::hash_password;

use crate::config::AdminConfig;

/// Verify the admin account configuration is usable.
pub fn verify_admin_config(config: &AdminConfig) -> anyhow::Result<()> {
    if config.email.trim().is_empty() || !config.email.contains('@') {
        anyhow::bail!("admin email is missing or invalid in configuration.");
    }
    if config.password_hash.is_none() && config.password.is_none() {
        anyhow::bail!(
            "No admin credentials found in configuration.\n\
             Set either [admin].password_hash (argon2id) or [admin].password."
        );
    }
    Ok(())
}

/// Ensure the configured admin account exists. Creates it if missing.
pub fn ensure_admin_account(svc: &AuthService, config: &AdminConfig) -> anyhow::Result<()> {
    let hash = match &config.password_hash {
        Some(hash) => hash.clone(),
        None => {
            let password = config
                .password
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("no admin credentials configured"))?;
            hash_password(password).map_err(|e| anyhow::anyhow!("{}", e))?
        }
    };

    svc.ensure_admin(&config.email, &config.name, &hash)
        .map_err(|e| anyhow::anyhow!("failed to ensure admin account: {}", e))
}
