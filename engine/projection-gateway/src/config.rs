//! Configuration for the ProjectionGateway
//!
//! Resolution order: defaults, then an optional TOML file, then environment
//! variables (a `.env` file is honoured), then command-line flags applied by
//! the binary.

use projection_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Main configuration for the ProjectionGateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,

    /// Projection engine configuration
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Maximum accepted request body in bytes
    pub max_body_bytes: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact, json)
    pub format: String,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter
    pub enabled: bool,

    /// Metrics export port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: crate::DEFAULT_PORT, max_body_bytes: 16 * 1024 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, port: 9090 }
    }
}

impl GatewayConfig {
    /// Get the server address
    pub fn server_addr(&self) -> GatewayResult<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    /// Get the metrics exporter address
    pub fn metrics_addr(&self) -> GatewayResult<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.metrics.port).parse()?)
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> GatewayResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from process environment variables
    pub fn apply_env(&mut self) -> GatewayResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> GatewayResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PROJECTION_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PROJECTION_PORT") {
            self.server.port = parse_var("PROJECTION_PORT", &port)?;
        }

        if let Some(level) = lookup("PROJECTION_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("PROJECTION_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(enabled) = lookup("PROJECTION_METRICS_ENABLED") {
            self.metrics.enabled = parse_var("PROJECTION_METRICS_ENABLED", &enabled)?;
        }

        if let Some(port) = lookup("PROJECTION_METRICS_PORT") {
            self.metrics.port = parse_var("PROJECTION_METRICS_PORT", &port)?;
        }

        if let Some(policy) = lookup("PROJECTION_RANGE_POLICY") {
            self.engine.range_policy = policy.parse()?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(GatewayError::Config(format!("Invalid log level: {}", other))),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => return Err(GatewayError::Config(format!("Invalid log format: {}", other))),
        }

        if self.server.port == 0 {
            return Err(GatewayError::Config("Invalid server port: 0".to_string()));
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(GatewayError::Config("Invalid metrics port: 0".to_string()));
        }

        if self.metrics.enabled && self.metrics.port == self.server.port {
            return Err(GatewayError::Config(format!(
                "Metrics port {} collides with the server port",
                self.metrics.port
            )));
        }

        if self.server.max_body_bytes == 0 {
            return Err(GatewayError::Config("max_body_bytes must be positive".to_string()));
        }

        self.server_addr()?;
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> GatewayResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

/// Load configuration from an optional file and the environment
///
/// The result is not validated; callers apply their own overrides first and
/// then call [`GatewayConfig::validate`].
pub fn load_config(path: Option<&Path>) -> GatewayResult<GatewayConfig> {
    // Missing .env is the normal case
    let _ = dotenv::dotenv();

    let mut config = match path {
        Some(path) => {
            debug!("Loading configuration from file: {:?}", path);
            GatewayConfig::load_from_file(path)?
        }
        None => GatewayConfig::default(),
    };

    config.apply_env()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection_engine::RangePolicy;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr().unwrap().port(), 8000);
        assert_eq!(config.engine.range_policy, RangePolicy::PassThrough);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8181

[engine]
range_policy = "strict"
"#
        )
        .unwrap();

        let config = GatewayConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engine.range_policy, RangePolicy::Strict);
        assert_eq!(config.engine.probability_decimals, 3);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped: GatewayConfig =
            toml::from_str(include_str!("../../../config/projection-gateway.toml")).unwrap();
        assert_eq!(shipped, GatewayConfig::default());
    }

    #[test]
    fn test_load_defers_validation_to_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"verbose\"").unwrap();

        let mut config = load_config(Some(file.path())).unwrap();
        assert!(config.validate().is_err());

        config.logging.level = "info".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");

        let mut config = GatewayConfig::default();
        config.logging.format = "json".to_string();
        config.save_to_file(&path).unwrap();

        assert_eq!(GatewayConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PROJECTION_HOST", "127.0.0.1"),
            ("PROJECTION_PORT", "9000"),
            ("PROJECTION_LOG_FORMAT", "json"),
            ("PROJECTION_METRICS_ENABLED", "true"),
            ("PROJECTION_RANGE_POLICY", "strict"),
        ]
        .into_iter()
        .collect();

        let mut config = GatewayConfig::default();
        config.apply_env_from(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.format, "json");
        assert!(config.metrics.enabled);
        assert_eq!(config.engine.range_policy, RangePolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_env_values_rejected() {
        let mut config = GatewayConfig::default();
        let result = config.apply_env_from(|key| {
            (key == "PROJECTION_PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));

        let mut config = GatewayConfig::default();
        let result = config.apply_env_from(|key| {
            (key == "PROJECTION_RANGE_POLICY").then(|| "loose".to_string())
        });
        assert!(matches!(result, Err(GatewayError::Projection(_))));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = GatewayConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.metrics.enabled = true;
        config.metrics.port = config.server.port;
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.server.host = "not a host".to_string();
        assert!(matches!(config.validate(), Err(GatewayError::Address(_))));
    }
}
