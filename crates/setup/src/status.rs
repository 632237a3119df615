//! Post-reconciliation view of the store.

use gsp_db::models::grant::GrantSummary;
use gsp_db::repositories::{GrantRepo, StatusRepo};
use gsp_db::DbPool;
use gsp_openai::CallShape;

/// How many grants the summary lists.
pub const TOP_GRANTS: i64 = 5;

/// Counts and highlights gathered once reconciliation is done.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub server_version: String,
    /// Shape that answered the AI connectivity probe.
    pub ai_shape: CallShape,
    pub grant_count: i64,
    pub user_count: i64,
    pub prediction_count: i64,
    pub top_grants: Vec<GrantSummary>,
}

impl StatusSnapshot {
    pub async fn collect(
        pool: &DbPool,
        server_version: String,
        ai_shape: CallShape,
    ) -> Result<Self, sqlx::Error> {
        Ok(Self {
            server_version,
            ai_shape,
            grant_count: GrantRepo::count(pool).await?,
            user_count: StatusRepo::count_rows(pool, "users").await?,
            prediction_count: StatusRepo::count_rows(pool, "predictions").await?,
            top_grants: GrantRepo::top_by_success_rate(pool, TOP_GRANTS).await?,
        })
    }
}
