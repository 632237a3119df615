//! The end-to-end bootstrap pass.
//!
//! Order is fixed: store probe, AI probe, schema, seed, status, report,
//! smoke test. Nothing touches the schema until both probes have passed,
//! and the store pool is closed on every exit path once it is open.

use gsp_core::catalog::reference_catalog;
use gsp_db::{LiveConnection, ReconcileOutcome, Reconciler};
use gsp_openai::{CallShape, Completion, OpenAiClient};

use crate::config::SetupConfig;
use crate::error::SetupError;
use crate::report;
use crate::status::StatusSnapshot;

/// Result of the end-of-run analysis call.
#[derive(Debug)]
pub enum SmokeTest {
    Skipped,
    Passed(Completion),
    /// Diagnostic text of the failure.
    Failed(String),
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: ReconcileOutcome,
    pub status: StatusSnapshot,
    pub smoke_test: SmokeTest,
}

/// Build the AI client described by `config`.
pub fn ai_client(config: &SetupConfig) -> OpenAiClient {
    OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.chat_model.clone(),
        config.legacy_model.clone(),
    )
}

/// Run the whole bootstrap against the configured store and provider.
pub async fn run(config: &SetupConfig) -> Result<RunSummary, SetupError> {
    tracing::info!("[1] Testing database connection");
    let live = gsp_db::probe_store(&config.database_url, config.db_max_connections)
        .await
        .map_err(SetupError::StoreConnectivity)?;
    tracing::info!(server_version = %live.server_version, "Database connection successful");

    let ai = ai_client(config);
    let result = run_with_store(config, &live, &ai).await;
    live.close().await;
    result
}

/// Everything after the store probe, against an already-live connection.
///
/// Does not close `live`.
pub async fn run_with_store(
    config: &SetupConfig,
    live: &LiveConnection,
    ai: &OpenAiClient,
) -> Result<RunSummary, SetupError> {
    tracing::info!("[2] Testing AI provider");
    let ai_shape = probe_ai_provider(ai).await?;

    tracing::info!("[3] Reconciling schema and reference grants");
    let catalog = reference_catalog();
    let outcome = Reconciler::new(&live.pool, &catalog).run().await?;
    tracing::info!(
        tables_created = outcome.schema.created.len(),
        grants_added = outcome.seed.inserted_count(),
        "Reconciliation done"
    );

    let status = StatusSnapshot::collect(&live.pool, live.server_version.clone(), ai_shape)
        .await
        .map_err(SetupError::Status)?;

    tracing::info!(path = %config.connection_info_path.display(), "[4] Writing connection info");
    report::write_connection_info(&config.connection_info_path, config, &status).await?;

    let smoke_test = if config.skip_ai_smoke_test {
        tracing::info!("[5] AI analysis smoke test skipped");
        SmokeTest::Skipped
    } else {
        tracing::info!("[5] Testing AI analysis");
        smoke_test(ai).await
    };

    Ok(RunSummary {
        outcome,
        status,
        smoke_test,
    })
}

/// One minimal completion; any transport or credential failure on every
/// call shape is fatal.
pub async fn probe_ai_provider(ai: &OpenAiClient) -> Result<CallShape, SetupError> {
    let shape = ai.probe().await.map_err(SetupError::AiConnectivity)?;
    tracing::info!(%shape, "AI provider connection successful");
    Ok(shape)
}

async fn smoke_test(ai: &OpenAiClient) -> SmokeTest {
    match ai.analyze_sample().await {
        Ok(completion) => {
            tracing::info!(shape = %completion.shape, "AI analysis test successful");
            SmokeTest::Passed(completion)
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI analysis test failed");
            SmokeTest::Failed(e.to_string())
        }
    }
}
