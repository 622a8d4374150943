use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub conceptmap: ConceptMapConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Skill-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptMapConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Title shown on every visual card
    #[serde(default = "default_card_title")]
    pub card_title: String,
}

impl Default for ConceptMapConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            card_title: default_card_title(),
        }
    }
}

/// Remote lookup services (id locator + traversal)
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_id_locator_url")]
    pub id_locator_url: String,
    #[serde(default = "default_traversal_url")]
    pub traversal_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Relationship identifier sent to the traversal service.
    /// The spoken relationship is not mapped; this one is always used.
    #[serde(default = "default_relationship_id")]
    pub relationship_id: String,
    /// Budget for one whole lookup call, retries and backoff included.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub max_retries: usize,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            id_locator_url: default_id_locator_url(),
            traversal_url: default_traversal_url(),
            language: default_language(),
            relationship_id: default_relationship_id(),
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
        }
    }
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            bind_address: default_bind_address(),
            allowed_origins: Vec::new(),
        }
    }
}

const MAX_RETRIES_LIMIT: usize = 5;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_card_title() -> String {
    "Concept Map".to_string()
}

fn default_id_locator_url() -> String {
    "https://conceptmap.cfapps.io/idlocator".to_string()
}

fn default_traversal_url() -> String {
    "https://conceptmap.cfapps.io/traversal".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_relationship_id() -> String {
    "P54".to_string()
}

fn default_timeout_ms() -> u64 {
    2500
}

fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in CONCEPTMAP_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("CONCEPTMAP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_service_url("services.id_locator_url", &self.services.id_locator_url)?;
        validate_service_url("services.traversal_url", &self.services.traversal_url)?;

        if self.services.language.trim().is_empty() {
            anyhow::bail!("services.language must not be empty");
        }

        if self.services.relationship_id.trim().is_empty() {
            anyhow::bail!("services.relationship_id must not be empty");
        }

        if self.services.timeout_ms == 0 {
            anyhow::bail!("services.timeout_ms must be greater than 0");
        }

        if self.services.max_retries > MAX_RETRIES_LIMIT {
            anyhow::bail!(
                "services.max_retries must be at most {} (got {})",
                MAX_RETRIES_LIMIT,
                self.services.max_retries
            );
        }

        Ok(())
    }
}

fn validate_service_url(key: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", key, value))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("{} must use http or https, not {}", key, other),
    }
    // Lookup parameters are appended as the query string.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        anyhow::bail!("{} must not carry a query string or fragment: {}", key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[conceptmap]
log_level = "debug"

[services]
id_locator_url = "http://127.0.0.1:9000/idlocator"
traversal_url = "http://127.0.0.1:9000/traversal"
timeout_ms = 500
max_retries = 2

[http_server]
port = 9090
"#;

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("CONCEPTMAP_CONFIG").ok();
        std::env::set_var("CONCEPTMAP_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("CONCEPTMAP_CONFIG");
        if let Some(val) = original {
            std::env::set_var("CONCEPTMAP_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.conceptmap.log_level, "debug");
            assert_eq!(config.conceptmap.card_title, "Concept Map");
            assert_eq!(config.services.timeout_ms, 500);
            assert_eq!(config.services.max_retries, 2);
            assert_eq!(config.services.language, "en");
            assert_eq!(config.services.relationship_id, "P54");
            assert_eq!(config.http_server.port, 9090);
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        with_config_env(&temp_dir.path().join("nonexistent.toml"), || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("Failed to read config file"));
        });
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.services.id_locator_url, "https://conceptmap.cfapps.io/idlocator");
        assert_eq!(config.services.traversal_url, "https://conceptmap.cfapps.io/traversal");
        assert_eq!(config.services.timeout(), Duration::from_millis(2500));
        assert_eq!(config.services.max_retries, 0);
        assert_eq!(config.http_server.bind_address, "127.0.0.1");
        assert!(config.http_server.allowed_origins.is_empty());
    }

    #[test]
    fn test_default_matches_empty_toml() {
        let from_toml = Config::from_toml("").unwrap();
        let default = Config::default();
        assert_eq!(from_toml.services.traversal_url, default.services.traversal_url);
        assert_eq!(from_toml.conceptmap.card_title, default.conceptmap.card_title);
        assert!(default.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = Config::from_toml("[services]\nid_locator_url = \"not a url\"\n").unwrap_err();
        assert!(err.to_string().contains("services.id_locator_url"));

        let err = Config::from_toml("[services]\ntraversal_url = \"ftp://example.com/t\"\n").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_rejects_base_url_with_query() {
        let err = Config::from_toml("[services]\nid_locator_url = \"http://localhost/idlocator?key=abc\"\n").unwrap_err();
        assert!(err.to_string().contains("query string"));

        let err = Config::from_toml("[services]\ntraversal_url = \"http://localhost/traversal#top\"\n").unwrap_err();
        assert!(err.to_string().contains("services.traversal_url"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = Config::from_toml("[services]\ntimeout_ms = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_rejects_unbounded_retries() {
        let err = Config::from_toml("[services]\nmax_retries = 50\n").unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_rejects_empty_relationship() {
        let err = Config::from_toml("[services]\nrelationship_id = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("relationship_id"));
    }
}
