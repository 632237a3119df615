//! Store access for the bootstrap: connection probing, schema and seed
//! reconciliation, and the read-only queries behind the status summary.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod reconcile;
pub mod repositories;
pub mod schema;
pub mod seed;

pub use reconcile::{ReconcileOutcome, ReconcilePhase, Reconciler};
pub use schema::{SchemaError, SchemaReport, TitleGuard};
pub use seed::{SeedFailure, SeedReport};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial read-only query to confirm the link is live.
///
/// Returns the server's `version()` string.
pub async fn health_check(pool: &DbPool) -> Result<String, sqlx::Error> {
    let (version,): (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(version)
}

/// A pool that has answered a query.
pub struct LiveConnection {
    pub pool: DbPool,
    /// Output of `SELECT version()` at probe time.
    pub server_version: String,
}

impl LiveConnection {
    /// Close every connection in the pool and wait for them to shut down.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Open a pool and prove it is usable.
///
/// A pool that connects but cannot run `SELECT version()` is closed before
/// the error is returned.
pub async fn probe_store(
    database_url: &str,
    max_connections: u32,
) -> Result<LiveConnection, sqlx::Error> {
    let pool = create_pool(database_url, max_connections).await?;

    match health_check(&pool).await {
        Ok(server_version) => {
            tracing::debug!(%server_version, "Store answered version query");
            Ok(LiveConnection {
                pool,
                server_version,
            })
        }
        Err(e) => {
            pool.close().await;
            Err(e)
        }
    }
}
