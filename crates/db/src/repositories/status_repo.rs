//! Catalog and row-count queries used by the schema pass and the status
//! summary.

use sqlx::PgPool;

use crate::schema::TABLES;

/// Read-only inspection of the provisioned tables.
pub struct StatusRepo;

impl StatusRepo {
    /// Whether a base table named `table` exists in the current schema.
    pub async fn table_exists(pool: &PgPool, table: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1
                FROM information_schema.tables
                WHERE table_schema = current_schema()
                  AND table_name = $1
                  AND table_type = 'BASE TABLE'
            )",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Row count of one of the provisioned tables.
    ///
    /// Only names from [`TABLES`] are accepted since the name is spliced
    /// into the statement.
    pub async fn count_rows(pool: &PgPool, table: &str) -> Result<i64, sqlx::Error> {
        if !TABLES.iter().any(|t| t.name == table) {
            return Err(sqlx::Error::Protocol(format!(
                "refusing to count rows of unknown table {table}"
            )));
        }
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Names of the provisioned tables that currently exist, in creation
    /// order.
    pub async fn existing_tables(pool: &PgPool) -> Result<Vec<&'static str>, sqlx::Error> {
        let mut present = Vec::with_capacity(TABLES.len());
        for def in TABLES {
            if Self::table_exists(pool, def.name).await? {
                present.push(def.name);
            }
        }
        Ok(present)
    }
}
