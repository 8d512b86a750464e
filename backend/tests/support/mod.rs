#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use climate_api::db::LocalRepository;
use climate_api::models::Measurement;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process-global
/// environment so parallel tests do not observe each other's settings.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A slice of the Hawaii dataset: repeated stations, shared dates, gaps.
pub fn hawaii_rows() -> Vec<Measurement> {
    vec![
        Measurement::new("USC00519397", "2010-01-01", Some(0.08), Some(65.0)),
        Measurement::new("USC00513117", "2010-01-01", Some(0.28), Some(67.0)),
        Measurement::new("USC00519397", "2016-08-22", Some(0.4), Some(70.0)),
        Measurement::new("USC00519397", "2016-08-23", Some(0.0), Some(81.0)),
        Measurement::new("USC00513117", "2016-08-23", Some(0.15), Some(76.0)),
        Measurement::new("USC00514830", "2017-01-15", None, Some(66.0)),
        Measurement::new("USC00513117", "2017-08-23", Some(0.08), None),
        Measurement::new("USC00519397", "2017-08-23", Some(0.0), Some(81.0)),
    ]
}

pub fn hawaii_local() -> LocalRepository {
    LocalRepository::with_measurements(hawaii_rows())
}

#[cfg(feature = "sqlite-repo")]
pub mod sqlite {
    use std::path::{Path, PathBuf};

    use diesel::prelude::*;
    use diesel::sql_query;
    use diesel::sql_types::{Double, Nullable, Text};
    use diesel::sqlite::SqliteConnection;

    use climate_api::models::Measurement;

    const CREATE_MEASUREMENT: &str = "CREATE TABLE measurement (
        id INTEGER NOT NULL PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    )";

    const CREATE_STATION: &str = "CREATE TABLE station (
        id INTEGER NOT NULL PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    )";

    /// Write a Hawaii-shaped database holding `rows` and return its path.
    pub fn create_database(dir: &Path, rows: &[Measurement]) -> PathBuf {
        let path = dir.join("hawaii.sqlite");
        let url = path.to_str().expect("utf-8 temp path").to_string();
        let mut conn = SqliteConnection::establish(&url).expect("create sqlite file");

        sql_query(CREATE_MEASUREMENT).execute(&mut conn).unwrap();
        sql_query(CREATE_STATION).execute(&mut conn).unwrap();
        sql_query(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES ('USC00000000', 'STATION TABLE ONLY', 21.27, -157.82, 3.0)",
        )
        .execute(&mut conn)
        .unwrap();

        for m in rows {
            sql_query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
                .bind::<Text, _>(m.station.as_str())
                .bind::<Text, _>(m.date.as_str())
                .bind::<Nullable<Double>, _>(m.precipitation)
                .bind::<Nullable<Double>, _>(m.temperature_observation)
                .execute(&mut conn)
                .unwrap();
        }

        path
    }

    /// Run raw SQL against an existing fixture database.
    pub fn execute(path: &Path, sql: &str) {
        let url = path.to_str().expect("utf-8 temp path");
        let mut conn = SqliteConnection::establish(url).expect("open sqlite file");
        sql_query(sql).execute(&mut conn).unwrap();
    }

    /// A database file that exists but has no measurement table.
    pub fn create_schemaless_database(dir: &Path) -> PathBuf {
        let path = dir.join("empty.sqlite");
        let url = path.to_str().expect("utf-8 temp path").to_string();
        let mut conn = SqliteConnection::establish(&url).expect("create sqlite file");
        sql_query(CREATE_STATION).execute(&mut conn).unwrap();
        path
    }
}
