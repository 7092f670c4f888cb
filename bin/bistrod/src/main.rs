//! `bistrod` — the Customer Gateway.
//!
//! Usage:
//!   bistrod -c <config-name-or-path> [--listen <addr>]
//!
//! The config name resolves to `/etc/bistro/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use auth::guard::{
    CredentialVerifier, Guard, GuardConfig, ProviderTokenVerifier, SessionCookieVerifier,
};
use auth::service::AuthConfig;
use auth::{AuthModule, CUSTOMER_SESSION_COOKIE, PROVIDER_TOKEN_COOKIE};
use shop::ShopModule;

use config::ServerConfig;

/// Bistro Customer Gateway.
#[derive(Parser, Debug)]
#[command(name = "bistrod", about = "Bistro customer gateway")]
struct Cli {
    /// Config name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    server_config.verify()?;

    // Initialize storage: one store for the whole process, injected into
    // every service.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = bistro_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let sql: Arc<dyn bistro_sql::SqlStore> = Arc::new(
        bistro_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // ── Modules ──

    let auth_config = AuthConfig {
        session_secret: server_config.session.secret.clone(),
        session_ttl_secs: server_config.session.ttl_secs,
        provider_secret: server_config.session.provider_secret.clone(),
    };
    let auth_module = AuthModule::new(Arc::clone(&sql), auth_config)?;
    info!("Auth module initialized");

    let shop_module = ShopModule::new(Arc::clone(&sql))?;
    info!("Shop module initialized");

    // ── Guard: session cookie first, provider token second ──

    let mut verifiers: Vec<Arc<dyn CredentialVerifier>> = vec![Arc::new(
        SessionCookieVerifier::new(
            auth_module.service().codec().clone(),
            CUSTOMER_SESSION_COOKIE,
        ),
    )];
    if let Some(provider_secret) = auth_module.service().provider_secret() {
        verifiers.push(Arc::new(ProviderTokenVerifier::new(
            provider_secret,
            PROVIDER_TOKEN_COOKIE,
        )));
        info!("Provider token verifier enabled");
    }

    let guard = Guard::new(
        GuardConfig {
            public_paths: server_config.guard.public_paths.clone(),
            public_prefixes: server_config.guard.public_prefixes.clone(),
            login_path: server_config.guard.login_path.clone(),
            api_prefix: "/api".to_string(),
            clear_cookies: vec![
                CUSTOMER_SESSION_COOKIE.to_string(),
                PROVIDER_TOKEN_COOKIE.to_string(),
            ],
        },
        verifiers,
    );

    // Build router.
    let login_path = server_config.guard.login_path.clone();
    let app = routes::build_router(
        guard,
        vec![
            ("auth", auth_module.customer_routes(&login_path)),
            ("shop", shop_module.customer_routes()),
        ],
    );

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Customer gateway listening on {}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
