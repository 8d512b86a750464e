//! Repository configuration file support.
//!
//! Reads the store settings from a TOML file:
//!
//! ```toml
//! [repository]
//! type = "sqlite"
//!
//! [sqlite]
//! database_url = "Resources/hawaii.sqlite"
//! max_connections = 4
//! connect_timeout = 30
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
#[cfg(feature = "sqlite-repo")]
use super::repositories::SqliteConfig;

/// Name of the configuration file searched by [`RepositoryConfig::find_in`].
pub const CONFIG_FILE_NAME: &str = "climate.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "CLIMATE_CONFIG";

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub sqlite: SqliteSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_database_url() -> String {
    "Resources/hawaii.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_connect_timeout() -> u64 {
    30
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// First `climate.toml` found under `base`.
    ///
    /// Searches, in order:
    /// 1. `base/`
    /// 2. `base/backend/`
    /// 3. `base/../`
    pub fn find_in(base: &Path) -> Option<PathBuf> {
        [
            base.join(CONFIG_FILE_NAME),
            base.join("backend").join(CONFIG_FILE_NAME),
            base.join("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|path| path.is_file())
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }

    /// Convert to SqliteConfig if this is a SQLite configuration.
    #[cfg(feature = "sqlite-repo")]
    pub fn to_sqlite_config(&self) -> Result<Option<SqliteConfig>, RepositoryError> {
        if self.repository_type()? != RepositoryType::Sqlite {
            return Ok(None);
        }

        if self.sqlite.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "SQLite repository requires 'sqlite.database_url' setting",
            ));
        }
        if self.sqlite.max_connections == 0 {
            return Err(RepositoryError::configuration(
                "'sqlite.max_connections' must be at least 1",
            ));
        }

        Ok(Some(SqliteConfig {
            database_url: self.sqlite.database_url.clone(),
            max_pool_size: self.sqlite.max_connections,
            connection_timeout_sec: self.sqlite.connect_timeout,
        }))
    }
}
