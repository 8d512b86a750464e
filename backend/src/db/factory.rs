//! Repository factory for dependency injection.
//!
//! The process entry point builds exactly one repository here and hands it to
//! whatever serves requests; nothing in the crate holds a global store.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, info};

use super::repo_config::{RepositoryConfig, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
use super::repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
use super::repositories::{SqliteConfig, SqliteRepository};
#[cfg(feature = "sqlite-repo")]
use super::repository::ErrorContext;
use super::repository::{MeasurementRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// SQLite + Diesel implementation
    Sqlite,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("sqlite", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to SQLite when that backend is
    /// compiled in, otherwise Local.
    pub fn from_env() -> Result<Self, RepositoryError> {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(val) => val.parse().map_err(RepositoryError::configuration),
            Err(_) if cfg!(feature = "sqlite-repo") => Ok(Self::Sqlite),
            Err(_) => Ok(Self::Local),
        }
    }
}

#[cfg(not(feature = "sqlite-repo"))]
fn sqlite_disabled() -> RepositoryError {
    RepositoryError::configuration("SQLite repository feature not enabled")
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use climate_api::db::{RepositoryFactory, RepositoryType, SqliteConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SqliteConfig::with_url("Resources/hawaii.sqlite");
///     let _sqlite = RepositoryFactory::create_sqlite(&config).await?;
///
///     let _local = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `sqlite_config` - Database configuration, required for SQLite
    #[cfg(feature = "sqlite-repo")]
    pub async fn create(
        repo_type: RepositoryType,
        sqlite_config: Option<&SqliteConfig>,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        match repo_type {
            RepositoryType::Sqlite => {
                let config = sqlite_config.ok_or_else(|| {
                    RepositoryError::configuration("SQLite repository requires SqliteConfig")
                })?;
                let repo = Self::create_sqlite(config).await?;
                Ok(repo as Arc<dyn MeasurementRepository>)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Open a SQLite repository.
    ///
    /// Building the pool opens connections, so it runs on the blocking pool.
    #[cfg(feature = "sqlite-repo")]
    pub async fn create_sqlite(config: &SqliteConfig) -> RepositoryResult<Arc<SqliteRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || SqliteRepository::new(config))
            .await
            .map_err(|e| {
                RepositoryError::internal(format!("Task join error: {}", e))
                    .with_context(ErrorContext::new("create_sqlite"))
            })??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn MeasurementRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryType::from_env`] and `SqliteConfig::from_env` for the
    /// variables read.
    pub async fn from_env() -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        match RepositoryType::from_env()? {
            RepositoryType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let config = SqliteConfig::from_env().map_err(RepositoryError::configuration)?;
                    let repo = Self::create_sqlite(&config).await?;
                    Ok(repo as Arc<dyn MeasurementRepository>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    Err(sqlite_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Resolve the store the way the server does.
    ///
    /// 1. The file named by `CLIMATE_CONFIG`, if set
    /// 2. The first `climate.toml` found by [`RepositoryConfig::find_in`] under `base`
    /// 3. Environment variables, as in [`RepositoryFactory::from_env`]
    ///
    /// A file that exists but cannot be read or parsed is an error; it never
    /// falls through to the next source.
    pub async fn from_config_or_env(
        base: &Path,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            info!("Loading store configuration from {} ({})", path, CONFIG_PATH_ENV);
            return Self::from_config_file(&path).await;
        }

        match RepositoryConfig::find_in(base) {
            Some(path) => {
                info!("Loading store configuration from {}", path.display());
                Self::from_config_file(&path).await
            }
            None => {
                debug!("No {} under {}; using environment", CONFIG_FILE_NAME, base.display());
                Self::from_env().await
            }
        }
    }

    /// Create repository from a RepositoryConfig instance.
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        match config.repository_type()? {
            RepositoryType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let sqlite = config.to_sqlite_config()?.ok_or_else(|| {
                        RepositoryError::configuration(
                            "SQLite repository requires database configuration",
                        )
                    })?;
                    let repo = Self::create_sqlite(&sqlite).await?;
                    Ok(repo as Arc<dyn MeasurementRepository>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    Err(sqlite_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}
