//! Environment-driven repository construction.

mod support;

use climate_api::db::{RepositoryError, RepositoryFactory, RepositoryType};
use support::with_scoped_env;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn test_repository_type_from_env_explicit() {
    with_scoped_env(&[("REPOSITORY_TYPE", Some("local"))], || {
        assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local);
    });
}

#[test]
fn test_repository_type_from_env_invalid() {
    with_scoped_env(&[("REPOSITORY_TYPE", Some("postgres"))], || {
        assert!(matches!(
            RepositoryType::from_env(),
            Err(RepositoryError::ConfigurationError { .. })
        ));
    });
}

#[cfg(feature = "sqlite-repo")]
#[test]
fn test_repository_type_defaults_to_sqlite() {
    with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Sqlite);
    });
}

#[test]
fn test_factory_from_env_local() {
    let rt = runtime();
    with_scoped_env(&[("REPOSITORY_TYPE", Some("local"))], || {
        let repo = rt.block_on(RepositoryFactory::from_env()).unwrap();
        assert!(rt.block_on(repo.health_check()).unwrap());
    });
}

#[cfg(feature = "sqlite-repo")]
#[test]
fn test_factory_from_env_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::sqlite::create_database(dir.path(), &support::hawaii_rows());
    let rt = runtime();

    with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("sqlite")),
            ("DATABASE_URL", Some(path.to_str().unwrap())),
            ("SQLITE_POOL_MAX", Some("2")),
        ],
        || {
            let repo = rt.block_on(RepositoryFactory::from_env()).unwrap();
            let rows = rt.block_on(repo.all_measurements()).unwrap();
            assert_eq!(rows.len(), 8);
        },
    );
}

#[cfg(feature = "sqlite-repo")]
#[test]
fn test_sqlite_config_from_env() {
    use climate_api::db::SqliteConfig;

    with_scoped_env(
        &[
            ("DATABASE_URL", None),
            ("CLIMATE_DATABASE_URL", Some("/srv/climate.sqlite")),
            ("SQLITE_POOL_MAX", Some("6")),
            ("SQLITE_CONN_TIMEOUT_SEC", Some("not-a-number")),
        ],
        || {
            let config = SqliteConfig::from_env().unwrap();
            assert_eq!(config.database_url, "/srv/climate.sqlite");
            assert_eq!(config.max_pool_size, 6);
            assert_eq!(config.connection_timeout_sec, 30);
        },
    );

    with_scoped_env(&[("SQLITE_POOL_MAX", Some("0"))], || {
        assert!(SqliteConfig::from_env().is_err());
    });
}

#[test]
fn test_factory_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("climate.toml");
    std::fs::write(&config_path, "[repository]\ntype = \"local\"\n").unwrap();

    let rt = runtime();
    let repo = rt
        .block_on(RepositoryFactory::from_config_file(&config_path))
        .unwrap();
    assert!(rt.block_on(repo.all_stations()).unwrap().is_empty());
}

#[test]
fn test_factory_from_missing_config_file() {
    let rt = runtime();
    let result = rt.block_on(RepositoryFactory::from_config_file("/nonexistent/climate.toml"));
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

const LOCAL_CONFIG: &str = "[repository]\ntype = \"local\"\n";

#[test]
fn test_climate_toml_in_working_dir_beats_environment() {
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("climate.toml"), LOCAL_CONFIG).unwrap();
    let rt = runtime();

    // The environment alone would ask for a SQLite file that does not exist
    with_scoped_env(
        &[
            ("CLIMATE_CONFIG", None),
            ("REPOSITORY_TYPE", Some("sqlite")),
            ("DATABASE_URL", Some("/nonexistent/hawaii.sqlite")),
        ],
        || {
            let repo = rt
                .block_on(RepositoryFactory::from_config_or_env(base.path()))
                .unwrap();
            assert!(rt.block_on(repo.health_check()).unwrap());
            assert!(rt.block_on(repo.all_measurements()).unwrap().is_empty());
        },
    );
}

#[test]
fn test_climate_toml_in_backend_dir_is_found() {
    let base = tempfile::tempdir().unwrap();
    std::fs::create_dir(base.path().join("backend")).unwrap();
    std::fs::write(base.path().join("backend").join("climate.toml"), LOCAL_CONFIG).unwrap();
    let rt = runtime();

    with_scoped_env(
        &[("CLIMATE_CONFIG", None), ("REPOSITORY_TYPE", Some("bogus"))],
        || {
            let repo = rt.block_on(RepositoryFactory::from_config_or_env(base.path()));
            assert!(repo.is_ok());
        },
    );
}

#[test]
fn test_explicit_config_path_beats_climate_toml() {
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("climate.toml"), LOCAL_CONFIG).unwrap();
    let explicit = base.path().join("other.toml");
    std::fs::write(&explicit, "[repository]\ntype = \"oracle\"\n").unwrap();
    let rt = runtime();

    with_scoped_env(
        &[("CLIMATE_CONFIG", Some(explicit.to_str().unwrap()))],
        || {
            let result = rt.block_on(RepositoryFactory::from_config_or_env(base.path()));
            assert!(matches!(
                result,
                Err(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}

#[test]
fn test_unparsable_climate_toml_is_an_error() {
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("climate.toml"), "[repository\n").unwrap();
    let rt = runtime();

    with_scoped_env(
        &[("CLIMATE_CONFIG", None), ("REPOSITORY_TYPE", Some("local"))],
        || {
            let result = rt.block_on(RepositoryFactory::from_config_or_env(base.path()));
            assert!(matches!(
                result,
                Err(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}

#[test]
fn test_no_climate_toml_falls_back_to_environment() {
    let root = tempfile::tempdir().unwrap();
    let base = root.path().join("work");
    std::fs::create_dir(&base).unwrap();
    let rt = runtime();

    with_scoped_env(
        &[("CLIMATE_CONFIG", None), ("REPOSITORY_TYPE", Some("local"))],
        || {
            let repo = rt.block_on(RepositoryFactory::from_config_or_env(&base)).unwrap();
            assert!(rt.block_on(repo.health_check()).unwrap());
        },
    );

    #[cfg(feature = "sqlite-repo")]
    with_scoped_env(
        &[
            ("CLIMATE_CONFIG", None),
            ("REPOSITORY_TYPE", Some("sqlite")),
            ("DATABASE_URL", Some("/nonexistent/hawaii.sqlite")),
        ],
        || {
            let result = rt.block_on(RepositoryFactory::from_config_or_env(&base));
            assert!(matches!(
                result,
                Err(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}
