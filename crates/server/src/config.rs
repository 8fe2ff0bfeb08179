use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Outbound Telegram Bot API settings. The base URL is overridable so tests
/// can point the publisher at a local mock server.
#[derive(Clone, Debug, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `TELEGRAM__API_BASE_URL`) overrides
/// the file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    validate(app)
}

fn validate(mut app: AppConfig) -> Result<AppConfig, ConfigError> {
    if app.database_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_url must not be empty".into(),
        ));
    }
    if app.listen_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "listen_addr '{}' is not a valid socket address",
            app.listen_addr
        )));
    }
    if app.telegram.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "telegram.request_timeout_secs must be > 0".into(),
        ));
    }
    while app.telegram.api_base_url.ends_with('/') {
        app.telegram.api_base_url.pop();
    }
    if app.telegram.api_base_url.is_empty() {
        return Err(ConfigError::Validation(
            "telegram.api_base_url must not be empty".into(),
        ));
    }
    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: default_listen_addr(),
            telegram: TelegramConfig::default(),
        }
    }

    #[test]
    fn defaults_point_at_telegram() {
        let telegram = TelegramConfig::default();
        assert_eq!(telegram.api_base_url, "https://api.telegram.org");
        assert_eq!(telegram.request_timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_empty_database_url() {
        let mut app = base_config();
        app.database_url = "  ".to_string();
        assert!(validate(app).is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut app = base_config();
        app.telegram.request_timeout_secs = 0;
        assert!(validate(app).is_err());
    }

    #[test]
    fn validate_rejects_bad_listen_addr() {
        let mut app = base_config();
        app.listen_addr = "not-an-addr".to_string();
        assert!(validate(app).is_err());
    }

    #[test]
    fn validate_trims_trailing_slash_from_api_base() {
        let mut app = base_config();
        app.telegram.api_base_url = "https://api.telegram.org/".to_string();
        let app = validate(app).expect("valid config");
        assert_eq!(app.telegram.api_base_url, "https://api.telegram.org");
    }
}
