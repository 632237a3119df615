//! Idempotent seeding of the reference grant catalog.
//!
//! Each catalog entry is handled on its own: a rejected entry is recorded
//! and the remaining entries are still attempted.

use gsp_core::catalog::SeedGrant;
use gsp_core::deadline::seed_deadline;
use sqlx::PgPool;

use crate::repositories::GrantRepo;
use crate::schema::TitleGuard;

/// Why one catalog entry was not inserted.
#[derive(Debug, thiserror::Error)]
pub enum SeedFailure {
    #[error("grant {title:?} failed validation: {source}")]
    Invalid {
        title: String,
        #[source]
        source: gsp_core::CoreError,
    },

    #[error("grant {title:?} was rejected by the store: {source}")]
    Rejected {
        title: String,
        #[source]
        source: sqlx::Error,
    },
}

impl SeedFailure {
    pub fn title(&self) -> &str {
        match self {
            SeedFailure::Invalid { title, .. } | SeedFailure::Rejected { title, .. } => title,
        }
    }
}

/// Outcome of one seeding pass.
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Titles written by this pass.
    pub inserted: Vec<String>,
    /// Titles that were already present.
    pub skipped: Vec<String>,
    pub failed: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Insert every entry of `catalog` whose title is not yet in `grants`,
/// keeping titles unique the way `guard` says.
///
/// Never fails as a whole; per-entry problems end up in
/// [`SeedReport::failed`].
pub async fn reconcile_seed(
    pool: &PgPool,
    catalog: &[SeedGrant],
    guard: TitleGuard,
) -> SeedReport {
    let mut report = SeedReport::default();

    for grant in catalog {
        if let Err(source) = grant.check() {
            let failure = SeedFailure::Invalid {
                title: grant.title.clone(),
                source,
            };
            tracing::warn!(title = %grant.title, error = %failure, "Skipping invalid grant");
            report.failed.push(failure);
            continue;
        }

        match GrantRepo::insert_if_absent(pool, grant, seed_deadline(), guard).await {
            Ok(true) => {
                tracing::debug!(title = %grant.title, "Inserted grant");
                report.inserted.push(grant.title.clone());
            }
            Ok(false) => {
                tracing::debug!(title = %grant.title, "Grant already present");
                report.skipped.push(grant.title.clone());
            }
            Err(source) => {
                let failure = SeedFailure::Rejected {
                    title: grant.title.clone(),
                    source,
                };
                tracing::warn!(title = %grant.title, error = %failure, "Failed to insert grant");
                report.failed.push(failure);
            }
        }
    }

    tracing::info!(
        inserted = report.inserted_count(),
        skipped = report.skipped_count(),
        failed = report.failed.len(),
        "Seed reconciliation finished",
    );

    report
}
