use crate::utils::error::{PoolsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

/// Connection settings for the MySQL server backing the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_charset")]
    pub charset: String,
    #[serde(default = "default_pool_name")]
    pub pool_name: String,
    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// How long a checkout may wait for a free connection (milliseconds)
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String, // "json" or "pretty"
}

// Default values
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_db_host() -> String {
    "127.0.0.1".to_string()
}

fn default_db_user() -> String {
    "root".to_string()
}

fn default_db_name() -> String {
    "app".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_charset() -> String {
    "utf8mb4".to_string()
}

fn default_pool_name() -> String {
    "poolsight_pool".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_acquire_timeout_ms() -> u64 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            port: default_db_port(),
            charset: default_db_charset(),
            pool_name: default_pool_name(),
            pool_size: default_pool_size(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PoolsightError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| PoolsightError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Apply `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` and `DB_PORT`
    /// from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply database overrides using an arbitrary variable lookup.
    ///
    /// Variables the lookup does not know about leave the current value untouched.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = port.trim().parse().map_err(|e| {
                PoolsightError::Config(format!("Invalid DB_PORT '{}': {}", port, e))
            })?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.host.trim().is_empty() {
            return Err(PoolsightError::Config(
                "database host cannot be empty".to_string(),
            ));
        }

        if self.database.name.trim().is_empty() {
            return Err(PoolsightError::Config(
                "database name cannot be empty".to_string(),
            ));
        }

        if self.database.pool_size == 0 {
            return Err(PoolsightError::Config(
                "pool_size must be at least 1".to_string(),
            ));
        }

        if self.database.acquire_timeout_ms == 0 {
            return Err(PoolsightError::Config(
                "acquire_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(PoolsightError::Config(format!(
                "Invalid log format: {}. Must be 'pretty' or 'json'",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let example = r#"[server]
bind_address = "0.0.0.0"
bind_port = 5000

# DB_HOST, DB_USER, DB_PASSWORD, DB_NAME and DB_PORT override these values
[database]
host = "127.0.0.1"
user = "root"
password = ""
name = "app"
port = 3306
charset = "utf8mb4"
pool_name = "poolsight_pool"
pool_size = 5
acquire_timeout_ms = 3000

[logging]
level = "info"  # Options: "trace", "debug", "info", "warn", "error"
format = "pretty"  # Options: "pretty", "json"
"#;

        std::fs::write(path.as_ref(), example).map_err(|e| {
            PoolsightError::Config(format!("Failed to write example config: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.bind_port, 5000);
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.charset, "utf8mb4");
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.database.pool_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.acquire_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.host = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        config.logging.format = "json".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_replace_database_settings() {
        let vars: HashMap<&str, &str> = [
            ("DB_HOST", "db.internal"),
            ("DB_USER", "svc"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "tasks"),
            ("DB_PORT", "3307"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.user, "svc");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.name, "tasks");
        assert_eq!(config.database.port, 3307);
    }

    #[test]
    fn unset_env_keeps_defaults() {
        let mut config = Config::default();
        config.apply_overrides_from(|_| None).unwrap();

        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn invalid_db_port_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides_from(|key| (key == "DB_PORT").then(|| "not-a-port".to_string()))
            .unwrap_err();

        assert!(matches!(err, PoolsightError::Config(_)));
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn example_config_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poolsight.toml");

        Config::create_example(&path).unwrap();
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.database.pool_name, "poolsight_pool");
        assert_eq!(config.server.bind_port, 5000);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[database]\npool_size = 12\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.database.pool_size, 12);
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
    }
}
