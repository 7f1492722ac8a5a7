use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ConversationConfig {
    /// Idle time after which a session is swept
    pub stale_after_minutes: i64,
    /// How often the sweep runs
    pub sweep_interval_minutes: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            stale_after_minutes: 60,
            sweep_interval_minutes: 30,
        }
    }
}

/// Upper bound for both conversation timings (30 days)
pub const MAX_CONVERSATION_MINUTES: u64 = 30 * 24 * 60;

impl ConversationConfig {
    /// Clamped to 1 minute ..= `MAX_CONVERSATION_MINUTES`
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.stale_after_minutes
                .clamp(1, MAX_CONVERSATION_MINUTES as i64),
        )
    }

    /// Clamped to 1 minute ..= `MAX_CONVERSATION_MINUTES`
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.clamp(1, MAX_CONVERSATION_MINUTES) * 60)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, overridden by RUST_LOG
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Also write a daily rolling log file
    pub file_enabled: bool,
    /// Directory for the rolling log file
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,guide_api_server=debug".to_string(),
            format: "pretty".to_string(),
            file_enabled: true,
            directory: "logs".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from("config/settings")
    }

    /// Load from `path` (extension optional, file may be absent) layered under APP__* env vars
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();

        let config = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path().join("nope")).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.conversation.stale_after_minutes, 60);
        assert_eq!(settings.conversation.sweep_interval(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9191\n\n[conversation]\nstale_after_minutes = 15").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.conversation.stale_after(), chrono::Duration::minutes(15));
        assert_eq!(settings.server.max_body_bytes, 64 * 1024);
        assert_eq!(settings.logging.format, "pretty");
        assert!(settings.logging.file_enabled);
    }

    #[test]
    fn test_timings_are_clamped() {
        let config = ConversationConfig {
            stale_after_minutes: 1_000_000_000_000,
            sweep_interval_minutes: u64::MAX,
        };
        let max = MAX_CONVERSATION_MINUTES;
        assert_eq!(config.stale_after(), chrono::Duration::minutes(max as i64));
        assert_eq!(config.sweep_interval(), Duration::from_secs(max * 60));

        let config = ConversationConfig {
            stale_after_minutes: -5,
            sweep_interval_minutes: 0,
        };
        assert_eq!(config.stale_after(), chrono::Duration::minutes(1));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
    }
}
