// Copyright 2023 Remi Bernotavicius

use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

pub mod models;
pub mod query;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] diesel::ConnectionError),
    #[error("storage unavailable: failed to migrate database: {0}")]
    Migration(String),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("no such {0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(#[from] crate::planning::ValidationError),
}

impl Error {
    /// True when the store itself could not be reached, as opposed to a bad request against it.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Migration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn prepare(connection: &mut Connection) -> Result<()> {
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(connection)?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;
    for migration in applied {
        log::info!("applied migration {migration}");
    }
    Ok(())
}

pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let url = path.as_ref().to_string_lossy();
    log::debug!("opening database at {url}");
    let mut connection = Connection::establish(&url)?;
    prepare(&mut connection)?;
    Ok(connection)
}

#[cfg(test)]
pub fn establish_in_memory() -> Connection {
    let mut connection = Connection::establish(":memory:").unwrap();
    prepare(&mut connection).unwrap();
    connection
}

#[test]
fn migrations() {
    let mut conn = establish_in_memory();
    conn.revert_all_migrations(MIGRATIONS).unwrap();
    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn missing_directory_is_unavailable() {
    let path = std::env::temp_dir()
        .join("recipe-planner-does-not-exist")
        .join("nested")
        .join("data.sqlite");
    let error = establish_connection(path).err().unwrap();
    assert!(error.is_unavailable(), "{error}");
}
