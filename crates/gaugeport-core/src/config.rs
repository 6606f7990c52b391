//! config.toml parser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable that overrides `store.host`.
pub const HOST_ENV: &str = "HAWKULAR_HOSTNAME";

/// Upper bound accepted for `exposition.scrape_timeout_secs`.
pub const MAX_SCRAPE_TIMEOUT_SECS: u64 = 3600;

/// Errors raised while loading the configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Statically configured tenants, used when `discover_tenants` is off.
    pub tenants: Vec<String>,
    /// Resolve tenants with a store `list_tenants` call on every scrape.
    pub discover_tenants: bool,
    /// Allow-list of descriptor names to export.
    pub collect_metrics: Vec<String>,
    /// Unit suffix per descriptor name, e.g. `"cpu/usage" = "cores"`.
    pub metric_units: HashMap<String, String>,
    pub debug: bool,
    pub store: StoreConfig,
    pub exposition: ExpositionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub scheme: String,
    pub host: Option<String>,
    pub port: u16,
    pub path: String,
    /// Worker pool size shared by both collection stages.
    pub concurrency: usize,
    /// File holding the bearer token presented to the store.
    pub token_path: PathBuf,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpositionConfig {
    pub port: u16,
    pub metrics_path: String,
    /// Prefix prepended to every exported metric name.
    pub namespace: String,
    /// Deadline for one whole scrape, both stages included.
    pub scrape_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tenants: Vec::new(),
            discover_tenants: false,
            collect_metrics: Vec::new(),
            metric_units: HashMap::new(),
            debug: false,
            store: StoreConfig::default(),
            exposition: ExpositionConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: None,
            port: 443,
            path: "hawkular/metrics".to_string(),
            concurrency: 8,
            token_path: PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token"),
            request_timeout_secs: 10,
        }
    }
}

impl Default for ExpositionConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_path: "/metrics".to_string(),
            namespace: String::new(),
            scrape_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Read, parse, apply environment overrides and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the environment, looked up through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            self.store.host = Some(host);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "store.concurrency must be at least 1".to_string(),
            ));
        }
        if self.store.host.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Invalid(format!(
                "store.host is not set (set it in the config or via {HOST_ENV})"
            )));
        }
        if !self.discover_tenants && self.tenants.is_empty() {
            return Err(ConfigError::Invalid(
                "no tenants configured and discover_tenants is disabled".to_string(),
            ));
        }
        if !self.exposition.metrics_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "exposition.metrics_path must start with '/': {}",
                self.exposition.metrics_path
            )));
        }
        if self.exposition.metrics_path == "/healthz" {
            return Err(ConfigError::Invalid(
                "exposition.metrics_path must not be /healthz".to_string(),
            ));
        }
        let timeout = self.exposition.scrape_timeout_secs;
        if timeout == 0 || timeout > MAX_SCRAPE_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "exposition.scrape_timeout_secs must be between 1 and {MAX_SCRAPE_TIMEOUT_SECS}: {timeout}"
            )));
        }
        Ok(())
    }

    /// Unit suffix configured for a descriptor name, if any.
    pub fn unit_for(&self, descriptor_name: &str) -> Option<&str> {
        self.metric_units.get(descriptor_name).map(String::as_str)
    }

    /// Scrape deadline, capped at `MAX_SCRAPE_TIMEOUT_SECS`.
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.exposition.scrape_timeout_secs.min(MAX_SCRAPE_TIMEOUT_SECS))
    }
}

impl StoreConfig {
    /// Base URL of the store API, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.as_deref().unwrap_or("localhost");
        let path = self.path.trim_matches('/');
        if path.is_empty() {
            format!("{}://{}:{}", self.scheme, host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, host, self.port, path)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
tenants = ["t1", "t2"]
collect_metrics = ["cpu/usage", "memory/usage"]
debug = true

[metric_units]
"cpu/usage" = "cores"
"memory/usage" = "bytes"

[store]
host = "hawkular-metrics.openshift-infra"
port = 8443
concurrency = 4

[exposition]
port = 9100
namespace = "origin_"
"#;

    #[test]
    fn test_parse_full() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.tenants, vec!["t1", "t2"]);
        assert_eq!(config.unit_for("cpu/usage"), Some("cores"));
        assert_eq!(config.unit_for("network/rx"), None);
        assert_eq!(config.store.concurrency, 4);
        assert_eq!(config.store.scheme, "https");
        assert_eq!(config.exposition.port, 9100);
        assert_eq!(config.exposition.metrics_path, "/metrics");
        assert!(config.debug);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_uses_defaults() {
        let config = Config::parse("tenants = [\"t1\"]").unwrap();
        assert_eq!(config.store.port, 443);
        assert_eq!(config.store.path, "hawkular/metrics");
        assert_eq!(config.exposition.scrape_timeout_secs, 30);
        assert!(config.collect_metrics.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(matches!(Config::parse("tenants = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_host() {
        let config = Config::parse("tenants = [\"t1\"]")
            .unwrap()
            .with_env_overrides(|key| (key == HOST_ENV).then(|| "metrics.local".to_string()));
        assert_eq!(config.store.host.as_deref(), Some("metrics.local"));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_requires_host() {
        let config = Config::parse("tenants = [\"t1\"]").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut config = Config::parse(FULL).unwrap();
        config.store.concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_scrape_timeout_bounds() {
        let mut config = Config::parse(FULL).unwrap();
        config.exposition.scrape_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.exposition.scrape_timeout_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert_eq!(
            config.scrape_timeout(),
            Duration::from_secs(MAX_SCRAPE_TIMEOUT_SECS)
        );

        config.exposition.scrape_timeout_secs = MAX_SCRAPE_TIMEOUT_SECS;
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_healthz_metrics_path() {
        let mut config = Config::parse(FULL).unwrap();
        config.exposition.metrics_path = "/healthz".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_requires_tenant_source() {
        let mut config = Config::parse(FULL).unwrap();
        config.tenants.clear();
        assert!(config.validate().is_err());
        config.discover_tenants = true;
        config.validate().unwrap();
    }

    #[test]
    fn test_base_url() {
        let mut store = StoreConfig {
            host: Some("store".to_string()),
            ..StoreConfig::default()
        };
        assert_eq!(store.base_url(), "https://store:443/hawkular/metrics");
        store.path = "/".to_string();
        store.scheme = "http".to_string();
        store.port = 8080;
        assert_eq!(store.base_url(), "http://store:8080");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.collect_metrics.len(), 2);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/gaugeport.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
