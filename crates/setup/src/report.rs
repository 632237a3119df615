//! Human-readable output: the stdout summary and the connection-info file.

use std::fmt::{self, Write as _};
use std::path::Path;

use gsp_db::schema::{TitleGuard, GRANT_TITLE_INDEX, TABLES};

use crate::bootstrap::{RunSummary, SmokeTest};
use crate::config::SetupConfig;
use crate::error::SetupError;
use crate::status::StatusSnapshot;

/// Characters of the sample analysis shown in the summary.
pub const PREVIEW_CHARS: usize = 300;

const TABLE_DESCRIPTIONS: [(&str, &str); 6] = [
    ("grants", "Grant opportunities"),
    ("users", "User accounts"),
    ("applications", "User applications"),
    ("analysis_history", "Analysis logs"),
    ("predictions", "AI prediction records"),
    ("subscriptions", "Subscription management"),
];

fn describe(table: &str) -> &'static str {
    TABLE_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, desc)| *desc)
        .unwrap_or("")
}

/// Whole dollars with thousands separators, e.g. `$1,250,000`.
pub fn format_dollars(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn amount_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}-{}", format_dollars(min), format_dollars(max)),
        (Some(min), None) => format!("from {}", format_dollars(min)),
        (None, Some(max)) => format!("up to {}", format_dollars(max)),
        (None, None) => "n/a".to_string(),
    }
}

/// Contents of the connection-info file.
pub fn render_connection_info(config: &SetupConfig, status: &StatusSnapshot) -> String {
    let mut out = String::new();
    write_connection_info_text(&mut out, config, status).expect("write to String");
    out
}

fn write_connection_info_text(
    out: &mut String,
    config: &SetupConfig,
    status: &StatusSnapshot,
) -> fmt::Result {
    writeln!(out, "=== Grant Success Predictor Connection Info ===")?;
    writeln!(out)?;
    writeln!(out, "Database:")?;
    writeln!(out, "- Server: {}", status.server_version)?;
    writeln!(out, "- Total Grants: {}", status.grant_count)?;
    writeln!(out)?;
    writeln!(out, "OpenAI:")?;
    writeln!(out, "- Endpoint: {}", config.openai_base_url)?;
    writeln!(
        out,
        "- Model: {} (legacy fallback: {})",
        config.chat_model, config.legacy_model
    )?;
    writeln!(out, "- Call Shape: {}", status.ai_shape)?;
    writeln!(out, "- API Key: Configured")?;
    writeln!(out)?;
    writeln!(out, "Created Tables:")?;
    for def in TABLES {
        if def.name == "grants" {
            writeln!(
                out,
                "- grants: {} ({} records)",
                describe(def.name),
                status.grant_count
            )?;
        } else {
            writeln!(out, "- {}: {}", def.name, describe(def.name))?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Web Application:")?;
    writeln!(out, "- Frontend: Next.js")?;
    writeln!(out, "- Deployment: Vercel")?;
    writeln!(out, "- Local Testing: http://localhost:3000")
}

/// Write the connection-info file, replacing any previous one.
pub async fn write_connection_info(
    path: &Path,
    config: &SetupConfig,
    status: &StatusSnapshot,
) -> Result<(), SetupError> {
    tokio::fs::write(path, render_connection_info(config, status))
        .await
        .map_err(|source| SetupError::Report {
            path: path.to_path_buf(),
            source,
        })
}

/// Status summary printed at the end of a successful run.
pub fn render_summary(summary: &RunSummary, config: &SetupConfig) -> String {
    let mut out = String::new();
    write_summary(&mut out, summary, config).expect("write to String");
    out
}

fn write_summary(out: &mut String, summary: &RunSummary, config: &SetupConfig) -> fmt::Result {
    let status = &summary.status;
    let schema = &summary.outcome.schema;
    let seed = &summary.outcome.seed;

    writeln!(out, "[DATABASE STATUS]")?;
    writeln!(out, "   - Server: {}", status.server_version)?;
    writeln!(out, "   - Total Grants: {}", status.grant_count)?;
    writeln!(out, "   - Total Users: {}", status.user_count)?;
    writeln!(out, "   - Total Predictions: {}", status.prediction_count)?;
    writeln!(out)?;

    writeln!(out, "[SCHEMA]")?;
    writeln!(
        out,
        "   - Tables created: {}{}",
        schema.created.len(),
        list_suffix(&schema.created)
    )?;
    writeln!(out, "   - Tables already present: {}", schema.existing.len())?;
    if schema.title_guard == TitleGuard::PreCheck {
        writeln!(
            out,
            "   - WARNING: duplicate grant titles present, {GRANT_TITLE_INDEX} not created"
        )?;
    }
    writeln!(out)?;

    writeln!(out, "[SEED]")?;
    writeln!(
        out,
        "   {} new Grant records added. ({} already present, {} failed)",
        seed.inserted_count(),
        seed.skipped_count(),
        seed.failed.len()
    )?;
    for failure in &seed.failed {
        writeln!(out, "   - WARNING: {failure}")?;
    }
    writeln!(out)?;

    writeln!(out, "[AI PROVIDER]")?;
    writeln!(out, "   - Connectivity probe answered via {}", status.ai_shape)?;
    match &summary.smoke_test {
        SmokeTest::Skipped => writeln!(out, "   - Analysis smoke test: skipped")?,
        SmokeTest::Passed(completion) => {
            writeln!(out, "   - Analysis smoke test: ok ({})", completion.shape)?;
            writeln!(out)?;
            writeln!(out, "Sample analysis result:")?;
            writeln!(out, "{}", preview(completion.text.trim(), PREVIEW_CHARS))?;
        }
        SmokeTest::Failed(reason) => {
            writeln!(out, "   - WARNING: analysis smoke test failed: {reason}")?
        }
    }
    writeln!(out)?;

    writeln!(out, "[AVAILABLE GRANTS]")?;
    for grant in &status.top_grants {
        writeln!(out, "   - {}", grant.title)?;
        writeln!(
            out,
            "     Agency: {} | Amount: {}",
            grant.agency.as_deref().unwrap_or("n/a"),
            amount_range(grant.amount_min, grant.amount_max)
        )?;
        let rate = grant
            .success_rate
            .map(|r| format!("{r:.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "     Category: {} | Success Rate: {rate}",
            grant.category.as_deref().unwrap_or("n/a")
        )?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "Connection info written to {}",
        config.connection_info_path.display()
    )?;
    writeln!(out, "SETUP COMPLETE!")
}

fn list_suffix(names: &[&str]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(" ({})", names.join(", "))
    }
}
