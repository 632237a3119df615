//! Grant rows as read for the status summary.

use serde::Serialize;
use sqlx::FromRow;

/// Display projection of a `grants` row.
///
/// Numeric columns are cast to `FLOAT8` in the query; they are only shown,
/// never written back.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GrantSummary {
    pub title: String,
    pub agency: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub category: Option<String>,
    pub success_rate: Option<f64>,
}
