use std::path::PathBuf;

use gsp_db::SchemaError;
use gsp_openai::OpenAiError;

use crate::config::ConfigError;

/// Fatal bootstrap failures. Every variant ends the process with a
/// non-zero status.
///
/// Seed record failures and a failed smoke test are not here: they are
/// reported and the run still succeeds.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    StoreConnectivity(#[source] sqlx::Error),

    #[error("AI provider connection failed: {0}")]
    AiConnectivity(#[source] OpenAiError),

    #[error("schema creation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("failed to read database status: {0}")]
    Status(#[source] sqlx::Error),

    #[error("failed to write {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SetupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::Config(_) => 2,
            SetupError::StoreConnectivity(_) | SetupError::AiConnectivity(_) => 3,
            SetupError::Schema(_) => 4,
            SetupError::Status(_) | SetupError::Report { .. } => 5,
        }
    }

    /// Operator-facing next step, when there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SetupError::Config(_) => Some("Check .env.local or the process environment."),
            SetupError::StoreConnectivity(_) => Some("Please check your DATABASE_URL!"),
            SetupError::AiConnectivity(e) if e.is_auth_failure() => {
                Some("Please check your OPENAI_API_KEY!")
            }
            SetupError::AiConnectivity(_) => {
                Some("Please check OPENAI_BASE_URL and network access to the provider.")
            }
            SetupError::Schema(_) => {
                Some("Compare the existing tables with the expected layout and run setup again.")
            }
            _ => None,
        }
    }
}
