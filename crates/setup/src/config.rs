use std::path::PathBuf;

/// Default API root for the AI provider.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LEGACY_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 2;
pub const DEFAULT_CONNECTION_INFO_PATH: &str = "connection_info.txt";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Bootstrap configuration, built once at start-up and passed by reference.
#[derive(Clone)]
pub struct SetupConfig {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Model for chat completions.
    pub chat_model: String,
    /// Model for the legacy completions fallback.
    pub legacy_model: String,
    pub db_max_connections: u32,
    /// Where the connection-info report is written.
    pub connection_info_path: PathBuf,
    pub skip_ai_smoke_test: bool,
}

/// Load `.env.local`, then `.env`, into the process environment.
///
/// Variables already set in the environment are never overridden, and
/// missing files are ignored.
pub fn load_env_files() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
}

impl SetupConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `DATABASE_URL`         | required                     |
    /// | `OPENAI_API_KEY`       | required                     |
    /// | `OPENAI_BASE_URL`      | `https://api.openai.com/v1`  |
    /// | `OPENAI_MODEL`         | `gpt-3.5-turbo`              |
    /// | `OPENAI_LEGACY_MODEL`  | `gpt-3.5-turbo-instruct`     |
    /// | `DB_MAX_CONNECTIONS`   | `2`                          |
    /// | `CONNECTION_INFO_PATH` | `connection_info.txt`        |
    /// | `SKIP_AI_SMOKE_TEST`   | `false`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let openai_api_key =
            get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let openai_base_url =
            get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into());
        let chat_model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.into());
        let legacy_model =
            get("OPENAI_LEGACY_MODEL").unwrap_or_else(|| DEFAULT_LEGACY_MODEL.into());

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "must be at least 1".into(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let connection_info_path = get("CONNECTION_INFO_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONNECTION_INFO_PATH));

        let skip_ai_smoke_test = match get("SKIP_AI_SMOKE_TEST") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "SKIP_AI_SMOKE_TEST",
                value: raw.clone(),
                reason: "expected true/false".into(),
            })?,
            None => false,
        };

        Ok(Self {
            database_url,
            openai_api_key,
            openai_base_url,
            chat_model,
            legacy_model,
            db_max_connections,
            connection_info_path,
            skip_ai_smoke_test,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl std::fmt::Debug for SetupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupConfig")
            .field("database_url", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("legacy_model", &self.legacy_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("connection_info_path", &self.connection_info_path)
            .field("skip_ai_smoke_test", &self.skip_ai_smoke_test)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/grants"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = SetupConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.legacy_model, "gpt-3.5-turbo-instruct");
        assert_eq!(config.db_max_connections, 2);
        assert_eq!(config.connection_info_path, PathBuf::from("connection_info.txt"));
        assert!(!config.skip_ai_smoke_test);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let result = SetupConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")]));
        assert_matches!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = SetupConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/grants"),
            ("OPENAI_API_KEY", "   "),
        ]));
        assert_matches!(result, Err(ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn zero_connections_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DB_MAX_CONNECTIONS", "0"));
        let result = SetupConfig::from_lookup(lookup(&pairs));
        assert_matches!(
            result,
            Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                ..
            })
        );
    }

    #[test]
    fn overrides_are_honoured() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("OPENAI_MODEL", "gpt-4"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("CONNECTION_INFO_PATH", "/tmp/info.txt"),
            ("SKIP_AI_SMOKE_TEST", "yes"),
        ]);
        let config = SetupConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(config.chat_model, "gpt-4");
        assert_eq!(config.db_max_connections, 4);
        assert_eq!(config.connection_info_path, PathBuf::from("/tmp/info.txt"));
        assert!(config.skip_ai_smoke_test);
    }

    #[test]
    fn unparsable_flag_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SKIP_AI_SMOKE_TEST", "maybe"));
        assert_matches!(
            SetupConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid {
                var: "SKIP_AI_SMOKE_TEST",
                ..
            })
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = SetupConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("postgres://"));
    }
}
