use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use site_server::config::AppConfig;
use site_server::database::{self, DbHandle};
use site_server::notify::{MailgunNotifier, Notifier};
use site_server::state::AppState;
use site_server::store::{ContactStore, SeaOrmContactStore};
use site_server::{build_router, seed};

const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);
const DB_RECHECK_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let db = match database::init_db(&config.database).await {
        Ok(conn) => {
            info!("Connected to database");
            DbHandle::connected(conn, config.database.timeout())
        }
        Err(e) if config.database.required => {
            return Err(e).context("Database is required but unreachable");
        }
        Err(e) => {
            warn!(error = %e, "Database unreachable, accepting submissions without storage");
            DbHandle::disconnected()
        }
    };

    let contacts = Arc::new(SeaOrmContactStore::new(db.clone()));
    if db.is_available() {
        if let Err(e) = contacts.ensure_indexes().await {
            warn!(error = %e, "Failed to ensure contact indexes");
        }
        if config.seed.enabled
            && let Some(conn) = db.conn()
            && let Err(e) = seed::seed_catalogue(conn).await
        {
            warn!(error = %e, "Failed to seed catalogue");
        }
    }

    let notifier = MailgunNotifier::new(&config.mail).context("Failed to build mail client")?;
    if !notifier.is_configured() {
        warn!("Mailgun credentials missing, notification emails are disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host or server.port")?;

    let state = AppState::new(config, db.clone(), contacts, Arc::new(notifier));
    state.limits.spawn_cleanup(LIMITER_CLEANUP_INTERVAL);
    state.db.spawn_recheck(DB_RECHECK_INTERVAL);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    db.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
