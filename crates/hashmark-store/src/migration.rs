//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration transforms the
//! schema of one ledger table from version N to N+1. Versions are tracked per
//! table so several ledgers can share a database file.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Check that a table name is safe to splice into SQL.
///
/// Names must start with a letter, contain only ASCII letters and digits,
/// and be 3 to 63 characters long.
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid_len = (3..=63).contains(&name.len());
    let starts_alpha = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let all_alnum = name.chars().all(|c| c.is_ascii_alphanumeric());

    if valid_len && starts_alpha && all_alnum {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}

/// Initialize or migrate the schema of a ledger table.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            table_name TEXT NOT NULL,
            version INTEGER NOT NULL,
            applied_at INTEGER NOT NULL,
            PRIMARY KEY (table_name, version)
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations WHERE table_name = ?1",
        [table],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, table, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (table_name, version, applied_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![table, version, chrono::Utc::now().timestamp_millis()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(table, version = CURRENT_VERSION, "ledger schema migrated");
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, table: &str, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn, table),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection, table: &str) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE {table} (
            partition_key TEXT NOT NULL,          -- ingest date, YYYY-MM-DD
            row_key TEXT NOT NULL,                -- unix seconds + '_' + 8 hex of sha256
            sha256_hash TEXT NOT NULL,            -- primary digest, lookup key
            sha3_hash TEXT NOT NULL,              -- secondary digest, audit only
            original_filename TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            upload_timestamp TEXT NOT NULL,       -- RFC 3339
            hash_algorithm_version TEXT NOT NULL,
            verification_count INTEGER NOT NULL DEFAULT 0,
            last_verified TEXT,                   -- RFC 3339, nullable
            status TEXT NOT NULL,
            auto_deleted INTEGER NOT NULL DEFAULT 1,

            PRIMARY KEY (partition_key, row_key)
        );

        -- Not unique: racing ingests may record the same hash twice
        CREATE INDEX idx_{table}_sha256 ON {table}(sha256_hash);
        "#
    ))?;

    Ok(())
}
