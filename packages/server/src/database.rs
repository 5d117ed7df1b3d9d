use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections.max(1))
        .connect_timeout(config.timeout())
        .acquire_timeout(config.timeout())
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("site_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Shared database handle.
///
/// May be built without a connection when the database was unreachable at
/// startup and durability is not required. The availability flag follows the
/// outcome of the most recent storage call or [`DbHandle::ping`].
#[derive(Clone)]
pub struct DbHandle {
    conn: Option<DatabaseConnection>,
    available: Arc<AtomicBool>,
    timeout: Duration,
}

impl DbHandle {
    pub fn connected(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self {
            conn: Some(conn),
            available: Arc::new(AtomicBool::new(true)),
            timeout,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            conn: None,
            available: Arc::new(AtomicBool::new(false)),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn conn(&self) -> Option<&DatabaseConnection> {
        self.conn.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some() && self.available.load(Ordering::Relaxed)
    }

    /// Per-call upper bound for storage operations.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Records the outcome of a storage call. No effect without a connection.
    pub fn mark(&self, available: bool) {
        if self.conn.is_none() {
            return;
        }
        let previous = self.available.swap(available, Ordering::Relaxed);
        if previous != available {
            if available {
                info!("Database connection restored");
            } else {
                warn!("Database marked unavailable");
            }
        }
    }

    /// Pings the database under the call timeout and records the result.
    pub async fn ping(&self) -> bool {
        let Some(conn) = &self.conn else {
            return false;
        };
        let ok = match tokio::time::timeout(self.timeout, conn.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Database ping failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Database ping timed out");
                false
            }
        };
        self.mark(ok);
        ok
    }

    /// Pings periodically while the database is marked unavailable so the flag
    /// recovers without waiting for the next write.
    pub fn spawn_recheck(&self, interval: Duration) {
        if self.conn.is_none() {
            return;
        }
        let db = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !db.is_available() {
                    db.ping().await;
                }
            }
        });
    }

    /// Drains the pool. In-flight handles keep working until they are dropped.
    pub async fn close(self) {
        if let Some(conn) = self.conn {
            if let Err(e) = conn.close().await {
                warn!(error = %e, "Failed to close database pool");
            } else {
                info!("Database pool closed");
            }
        }
    }
}
