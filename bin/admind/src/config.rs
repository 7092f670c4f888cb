//! Admin Gateway configuration.
//!
//! Same TOML shape as the Customer Gateway, plus the `[admin]` section
//! describing the bootstrap admin account.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub guard: GuardSettings,

    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding all persistent data.
    #[serde(default)]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session token signing secret. Must be set.
    #[serde(default)]
    pub secret: String,

    /// Session token lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,

    /// Shared secret for verifying third-party provider tokens.
    #[serde(default)]
    pub provider_secret: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: default_ttl_secs(),
            provider_secret: None,
        }
    }
}

fn default_ttl_secs() -> i64 {
    600
}

/// The bootstrap admin account, created at startup if missing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,

    #[serde(default = "default_admin_name")]
    pub name: String,

    /// Precomputed argon2id hash of the admin password.
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Plaintext password, hashed at startup. Development convenience;
    /// prefer `password_hash`.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuardSettings {
    /// Exact paths that skip authentication.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Path prefixes that skip authentication.
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,

    /// Login page path, the redirect target on rejection.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
            public_prefixes: default_public_prefixes(),
            login_path: default_login_path(),
        }
    }
}

fn default_public_paths() -> Vec<String> {
    ["/", "/login"].map(String::from).to_vec()
}

fn default_public_prefixes() -> Vec<String> {
    ["/health", "/version", "/assets/", "/auth", "/logout"]
        .map(String::from)
        .to_vec()
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/bistro/{}.toml", name_or_path))
        }
    }

    /// Load the configuration from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Refuse to start on a configuration that cannot work.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.session.secret.is_empty() {
            anyhow::bail!("session secret is empty in configuration.");
        }
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage data_dir is empty in configuration.");
        }
        crate::bootstrap::verify_admin_config(&self.admin)?;
        Ok(())
    }
}
