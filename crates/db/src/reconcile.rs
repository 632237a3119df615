//! The schema/seed reconciler.
//!
//! One pass moves strictly forward through
//! `Start -> SchemaEnsured -> Seeding -> Done`. A schema error stops the
//! pass before `Seeding`; seed failures never do.

use gsp_core::catalog::SeedGrant;
use sqlx::PgPool;

use crate::schema::{self, SchemaError, SchemaReport};
use crate::seed::{self, SeedReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReconcilePhase {
    Start,
    SchemaEnsured,
    Seeding,
    Done,
}

/// Result of a completed pass.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub schema: SchemaReport,
    pub seed: SeedReport,
    pub phase: ReconcilePhase,
}

/// Brings a store from an unknown prior state to fully provisioned.
pub struct Reconciler<'a> {
    pool: &'a PgPool,
    catalog: &'a [SeedGrant],
    phase: ReconcilePhase,
}

impl<'a> Reconciler<'a> {
    pub fn new(pool: &'a PgPool, catalog: &'a [SeedGrant]) -> Self {
        Self {
            pool,
            catalog,
            phase: ReconcilePhase::Start,
        }
    }

    pub fn phase(&self) -> ReconcilePhase {
        self.phase
    }

    fn advance(&mut self, next: ReconcilePhase) {
        debug_assert!(next > self.phase, "reconciler cannot move back to {next:?}");
        tracing::debug!(from = ?self.phase, to = ?next, "Reconciler phase change");
        self.phase = next;
    }

    /// Run the full pass.
    pub async fn run(mut self) -> Result<ReconcileOutcome, SchemaError> {
        tracing::info!("Ensuring schema");
        let schema = schema::ensure_schema(self.pool).await?;
        tracing::info!(
            created = schema.created.len(),
            existing = schema.existing.len(),
            "Schema ensured",
        );
        self.advance(ReconcilePhase::SchemaEnsured);

        self.advance(ReconcilePhase::Seeding);
        tracing::info!(
            entries = self.catalog.len(),
            title_guard = ?schema.title_guard,
            "Seeding reference grants",
        );
        let seed = seed::reconcile_seed(self.pool, self.catalog, schema.title_guard).await;

        self.advance(ReconcilePhase::Done);

        Ok(ReconcileOutcome {
            schema,
            seed,
            phase: self.phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(ReconcilePhase::Start < ReconcilePhase::SchemaEnsured);
        assert!(ReconcilePhase::SchemaEnsured < ReconcilePhase::Seeding);
        assert!(ReconcilePhase::Seeding < ReconcilePhase::Done);
    }

    #[tokio::test]
    async fn new_reconciler_starts_at_start() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let catalog = gsp_core::catalog::reference_catalog();
        let reconciler = Reconciler::new(&pool, &catalog);
        assert_eq!(reconciler.phase(), ReconcilePhase::Start);
    }
}
