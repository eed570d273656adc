use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::StartupError;
use crate::sinks::file::DEFAULT_LOG_FILE;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "Monitoring")]
    pub monitoring: MonitoringConfig,
    #[serde(alias = "Engine")]
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    #[serde(alias = "IntervalSeconds")]
    pub interval_seconds: u64,
    #[serde(alias = "ApiEndpoint")]
    pub api_endpoint: String,
    #[serde(alias = "LogFilePath")]
    pub log_file_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        MonitoringConfig {
            interval_seconds: 5,
            api_endpoint: String::new(),
            log_file_path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-sink delivery bound. Defaults to the tick interval.
    pub sink_timeout_ms: Option<u64>,
    /// How long an in-flight tick may run after cancellation.
    pub shutdown_grace_ms: u64,
    pub console: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sink_timeout_ms: None,
            shutdown_grace_ms: 5000,
            console: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.monitoring.interval_seconds == 0 {
            return Err(StartupError::Invalid {
                field: "interval_seconds",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.engine.sink_timeout_ms == Some(0) {
            return Err(StartupError::Invalid {
                field: "sink_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.interval_seconds)
    }

    pub fn sink_timeout(&self) -> Duration {
        self.engine
            .sink_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.interval())
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.engine.shutdown_grace_ms)
    }

    pub fn log_file_path(&self) -> PathBuf {
        let trimmed = self.monitoring.log_file_path.trim();
        if trimmed.is_empty() {
            PathBuf::from(DEFAULT_LOG_FILE)
        } else {
            PathBuf::from(trimmed)
        }
    }

    /// `None` when the remote sink is disabled.
    pub fn api_endpoint(&self) -> Option<&str> {
        let trimmed = self.monitoring.api_endpoint.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hostwatch").join("config.toml"))
}

/// Load from the per-user config path when it exists, defaults otherwise.
pub fn load_config() -> Result<Config, StartupError> {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Ok(Config::default()),
    }
}

/// `.json` files are read with serde_json (accepting the `appsettings.json`
/// layout); anything else is TOML.
pub fn load_config_from_path(path: &Path) -> Result<Config, StartupError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StartupError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    } else {
        toml::from_str(&contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| StartupError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hostwatch_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.monitoring.interval_seconds, 5);
        assert_eq!(config.log_file_path(), PathBuf::from("log.txt"));
        assert_eq!(config.api_endpoint(), None);
        assert_eq!(config.sink_timeout(), Duration::from_secs(5));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
        assert!(config.engine.console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[monitoring]
interval_seconds = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interval(), Duration::from_secs(2));
        assert_eq!(config.monitoring.log_file_path, "log.txt");
        assert_eq!(config.engine.shutdown_grace_ms, 5000);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[monitoring]
interval_seconds = 10
api_endpoint = "https://metrics.example.com/usage"
log_file_path = "logs/usage.log"

[engine]
sink_timeout_ms = 1500
shutdown_grace_ms = 250
console = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interval(), Duration::from_secs(10));
        assert_eq!(
            config.api_endpoint(),
            Some("https://metrics.example.com/usage")
        );
        assert_eq!(config.log_file_path(), PathBuf::from("logs/usage.log"));
        assert_eq!(config.sink_timeout(), Duration::from_millis(1500));
        assert_eq!(config.shutdown_grace(), Duration::from_millis(250));
        assert!(!config.engine.console);
    }

    #[test]
    fn blank_log_path_falls_back() {
        let mut config = Config::default();
        config.monitoring.log_file_path = "  ".to_string();
        assert_eq!(config.log_file_path(), PathBuf::from("log.txt"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = Config::default();
        config.monitoring.interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(StartupError::Invalid {
                field: "interval_seconds",
                ..
            })
        ));
    }

    #[test]
    fn appsettings_json_layout_is_accepted() {
        let path = temp_file(
            "appsettings.json",
            r#"{"Monitoring": {"IntervalSeconds": 3, "ApiEndpoint": "", "LogFilePath": "usage.log"}}"#,
        );
        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.monitoring.interval_seconds, 3);
        assert_eq!(config.api_endpoint(), None);
        assert_eq!(config.log_file_path(), PathBuf::from("usage.log"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config_from_path(Path::new("/nonexistent/path/config.toml")).unwrap_err();
        assert!(matches!(err, StartupError::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let path = temp_file("invalid.toml", "this is not valid toml {{{{");
        let err = load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, StartupError::Parse { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
