//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use vox_pipeline::PipelineConfig;
use vox_store::StoreConfig;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Object store gateway settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Transcription job API endpoint.
    #[serde(default = "default_transcribe_endpoint")]
    pub transcribe: ServiceEndpoint,

    /// Text-generation API endpoint.
    #[serde(default = "default_generate_endpoint")]
    pub generate: ServiceEndpoint,

    /// Speech synthesis API endpoint.
    #[serde(default = "default_synthesize_endpoint")]
    pub synthesize: ServiceEndpoint,

    /// Pipeline tuning (buckets, polling, persona, expiry).
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "vox_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Endpoint and credential for one external HTTP service.
#[derive(Clone, Deserialize)]
pub struct ServiceEndpoint {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
}

impl fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transcribe_endpoint() -> ServiceEndpoint {
    ServiceEndpoint {
        endpoint: "http://127.0.0.1:9100".to_string(),
        api_key: String::new(),
    }
}

fn default_generate_endpoint() -> ServiceEndpoint {
    ServiceEndpoint {
        endpoint: "http://127.0.0.1:9200".to_string(),
        api_key: String::new(),
    }
}

fn default_synthesize_endpoint() -> ServiceEndpoint {
    ServiceEndpoint {
        endpoint: "http://127.0.0.1:9300".to_string(),
        api_key: String::new(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
            transcribe: default_transcribe_endpoint(),
            generate: default_generate_endpoint(),
            synthesize: default_synthesize_endpoint(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `VOX_HOST` overrides `server.host`
/// - `VOX_PORT` overrides `server.port`
/// - `VOX_LOG_LEVEL` overrides `logging.level`
/// - `VOX_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `VOX_STORE_ACCESS_TOKEN` overrides `store.access_token`
/// - `VOX_STORE_SIGNING_SECRET` overrides `store.signing_secret`
/// - `VOX_TRANSCRIBE_API_KEY` overrides `transcribe.api_key`
/// - `VOX_GENERATE_API_KEY` overrides `generate.api_key`
/// - `VOX_SYNTHESIZE_API_KEY` overrides `synthesize.api_key`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("VOX_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("VOX_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("VOX_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("VOX_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(token) = std::env::var("VOX_STORE_ACCESS_TOKEN") {
        config.store.access_token = token;
    }
    if let Ok(secret) = std::env::var("VOX_STORE_SIGNING_SECRET") {
        config.store.signing_secret = secret;
    }
    if let Ok(key) = std::env::var("VOX_TRANSCRIBE_API_KEY") {
        config.transcribe.api_key = key;
    }
    if let Ok(key) = std::env::var("VOX_GENERATE_API_KEY") {
        config.generate.api_key = key;
    }
    if let Ok(key) = std::env::var("VOX_SYNTHESIZE_API_KEY") {
        config.synthesize.api_key = key;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file_given() {
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.pipeline.presign_expiry_secs, 300);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [generate]
            endpoint = "https://llm.internal"
            api_key = "sk-xyz"

            [pipeline]
            poll_max_attempts = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generate.endpoint, "https://llm.internal");
        assert_eq!(config.pipeline.poll_max_attempts, 40);
        // Untouched sections keep their defaults.
        assert_eq!(config.pipeline.poll_interval_ms, 3000);
        assert_eq!(config.transcribe.endpoint, "http://127.0.0.1:9100");
    }

    #[test]
    fn service_endpoint_debug_redacts_key() {
        let endpoint = ServiceEndpoint {
            endpoint: "https://llm.internal".to_string(),
            api_key: "sk-xyz".to_string(),
        };
        let rendered = format!("{:?}", endpoint);
        assert!(!rendered.contains("sk-xyz"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
