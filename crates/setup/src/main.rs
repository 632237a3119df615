//! `gsp-setup` -- one-shot environment bootstrap for the Grant Success
//! Predictor.
//!
//! Checks the database and AI provider, creates the application tables if
//! they are missing, seeds the reference grants without duplicating them,
//! and writes a connection-info file.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                     |
//! |------------------------|----------|-----------------------------|
//! | `DATABASE_URL`         | yes      | --                          |
//! | `OPENAI_API_KEY`       | yes      | --                          |
//! | `OPENAI_BASE_URL`      | no       | `https://api.openai.com/v1` |
//! | `OPENAI_MODEL`         | no       | `gpt-3.5-turbo`             |
//! | `OPENAI_LEGACY_MODEL`  | no       | `gpt-3.5-turbo-instruct`    |
//! | `DB_MAX_CONNECTIONS`   | no       | `2`                         |
//! | `CONNECTION_INFO_PATH` | no       | `connection_info.txt`       |
//! | `SKIP_AI_SMOKE_TEST`   | no       | `false`                     |

use gsp_setup::{bootstrap, config, report, SetupConfig, SetupError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    config::load_env_files();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gsp_setup=info,gsp_db=info,gsp_openai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match SetupConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(SetupError::from(e)),
    };
    tracing::info!(?config, "Starting Grant Success Predictor setup");

    match bootstrap::run(&config).await {
        Ok(summary) => {
            println!("{}", report::render_summary(&summary, &config));
        }
        Err(e) => fail(e),
    }
}

fn fail(err: SetupError) -> ! {
    tracing::error!(error = %err, "Setup failed");
    if let Some(hint) = err.hint() {
        eprintln!("{hint}");
    }
    std::process::exit(err.exit_code());
}
