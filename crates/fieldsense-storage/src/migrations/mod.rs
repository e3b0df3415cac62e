//! Schema migrations keyed by `PRAGMA user_version`.
//!
//! Each migration and its version bump commit together, so a failed
//! migration leaves the database at the previous version.

pub mod v001_initial;
pub mod v002_default_priors;

use fieldsense_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial schema",
        sql: v001_initial::MIGRATION_SQL,
    },
    Migration {
        version: 2,
        name: "default priors",
        sql: v002_default_priors::MIGRATION_SQL,
    },
];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 2;

/// Bring the database up to `LATEST_VERSION` and return the version reached.
///
/// A database from a newer build is refused rather than downgraded.
pub fn run_migrations(conn: &Connection) -> Result<u32, StorageError> {
    let mut version = current_version(conn)?;
    if version > LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version,
            message: format!("database is at version {version}, this build knows {LATEST_VERSION}"),
        });
    }

    let start = version;
    for migration in MIGRATIONS.iter().filter(|m| m.version > start) {
        apply(conn, migration)?;
        version = migration.version;
    }
    Ok(version)
}

fn apply(conn: &Connection, migration: &Migration) -> Result<(), StorageError> {
    let failed = |e: rusqlite::Error| StorageError::MigrationFailed {
        version: migration.version,
        message: e.to_string(),
    };

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(failed)?;
    tx.execute_batch(migration.sql).map_err(failed)?;
    tx.pragma_update(None, "user_version", migration.version)
        .map_err(failed)?;
    tx.commit().map_err(failed)?;

    tracing::info!(
        version = migration.version,
        name = migration.name,
        "applied migration"
    );
    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(StorageError::sqlite)
}
