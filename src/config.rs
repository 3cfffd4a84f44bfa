//! Configuration types for the record store server and the sync client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding [`ServerConfig::host`].
pub const ENV_HOST: &str = "TODOSYNC_HOST";
/// Environment variable overriding [`ServerConfig::port`].
pub const ENV_PORT: &str = "TODOSYNC_PORT";
/// Environment variable overriding [`StoreConfig::db_path`].
pub const ENV_DB_PATH: &str = "TODOSYNC_DB_PATH";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "TODOSYNC_BASE_URL";

/// Top-level configuration shared by both binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoConfig {
    /// HTTP listener settings for the record store.
    pub server: ServerConfig,
    /// SQLite backend settings.
    pub store: StoreConfig,
    /// Sync client settings.
    pub client: ClientConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port (`0` = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        }
    }
}

/// Record store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_data_dir().join("todo.db"),
        }
    }
}

/// Sync client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the record store, without a trailing slash.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_owned(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("todosync"))
        .unwrap_or_else(|| PathBuf::from("/tmp/todosync"))
}

impl TodoConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::TodoError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TodoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/todosync/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("todosync").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("/tmp/todosync-config/config.toml"))
    }

    /// Load from `path` when given, otherwise from the default path if it
    /// exists, otherwise defaults. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded or an
    /// override value is malformed.
    pub fn load(path: Option<&std::path::Path>) -> crate::error::Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `TODOSYNC_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Config`](crate::error::TodoError::Config) when
    /// the port override is not a valid `u16`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::error::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|e| {
                crate::error::TodoError::Config(format!("invalid {ENV_PORT} '{port}': {e}"))
            })?;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.store.db_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.client.base_url = url.trim_end_matches('/').to_owned();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = TodoConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.server.port > 0);
        assert!(config.store.db_path.ends_with("todo.db"));
        assert!(config.client.base_url.starts_with("http://"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TodoConfig::default();
        config.server.port = 8123;
        config.store.db_path = PathBuf::from("/var/lib/todosync/todo.db");

        config.save_to_file(&path).unwrap();
        let loaded = TodoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 8123);
        assert_eq!(
            loaded.store.db_path,
            PathBuf::from("/var/lib/todosync/todo.db")
        );
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: TodoConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.client.base_url, ClientConfig::default().base_url);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = TodoConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();
        assert!(TodoConfig::from_file(&path).is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "8080"),
            (ENV_DB_PATH, "/data/todo.db"),
            (ENV_BASE_URL, "http://todo.example:8080/"),
        ]);
        let mut config = TodoConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| (*v).to_owned()))
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.db_path, PathBuf::from("/data/todo.db"));
        assert_eq!(config.client.base_url, "http://todo.example:8080");
    }

    #[test]
    fn invalid_port_override_is_config_error() {
        let mut config = TodoConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_PORT).then(|| "not-a-port".to_owned()))
            .unwrap_err();
        assert!(matches!(err, crate::error::TodoError::Config(_)));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = TodoConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("todosync"));
    }
}
