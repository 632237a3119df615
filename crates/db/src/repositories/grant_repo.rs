//! Repository for the `grants` table.

use chrono::NaiveDate;
use gsp_core::catalog::{SeedGrant, SEED_SOURCE};
use sqlx::PgPool;

use crate::models::grant::GrantSummary;
use crate::schema::TitleGuard;

const SUMMARY_COLUMNS: &str = "\
    title, agency, amount_min::FLOAT8 AS amount_min, amount_max::FLOAT8 AS amount_max, \
    category, success_rate::FLOAT8 AS success_rate";

const INSERT_COLUMNS: &str = "\
    title, agency, amount_min, amount_max, deadline, description, \
    category, keywords, eligibility, source, url, success_rate";

const INSERT_VALUES: &str = "\
    $1, $2, $3::NUMERIC, $4::NUMERIC, $5, $6, $7, $8, $9, $10, $11, $12::NUMERIC";

/// Provides seed inserts and read-only queries for grants.
pub struct GrantRepo;

impl GrantRepo {
    /// Insert a catalog grant unless a row with the same title exists.
    ///
    /// With [`TitleGuard::UniqueIndex`] a conflict on `grants_title_key` is
    /// skipped; with [`TitleGuard::PreCheck`] the row is only selected for
    /// insert when no grant carries the title. Returns `true` when a row was
    /// written and `false` when the title was already present.
    pub async fn insert_if_absent(
        pool: &PgPool,
        grant: &SeedGrant,
        deadline: NaiveDate,
        guard: TitleGuard,
    ) -> Result<bool, sqlx::Error> {
        let query = match guard {
            TitleGuard::UniqueIndex => format!(
                "INSERT INTO grants ({INSERT_COLUMNS}) VALUES ({INSERT_VALUES}) \
                 ON CONFLICT (title) DO NOTHING"
            ),
            TitleGuard::PreCheck => format!(
                "INSERT INTO grants ({INSERT_COLUMNS}) SELECT {INSERT_VALUES} \
                 WHERE NOT EXISTS (SELECT 1 FROM grants WHERE title = $1)"
            ),
        };

        let result = sqlx::query(&query)
            .bind(&grant.title)
            .bind(&grant.agency)
            .bind(grant.amount_min)
            .bind(grant.amount_max)
            .bind(deadline)
            .bind(&grant.description)
            .bind(&grant.category)
            .bind(&grant.keywords)
            .bind(&grant.eligibility)
            .bind(SEED_SOURCE)
            .bind(&grant.url)
            .bind(grant.success_rate)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total number of grant rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grants")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// How many rows carry the given title.
    pub async fn count_by_title(pool: &PgPool, title: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grants WHERE title = $1")
            .bind(title)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Grants with the highest success rate first.
    pub async fn top_by_success_rate(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<GrantSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM grants \
             ORDER BY success_rate DESC NULLS LAST, title \
             LIMIT $1"
        );
        sqlx::query_as::<_, GrantSummary>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
