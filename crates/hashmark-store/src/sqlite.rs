//! SQLite implementation of the Ledger trait.
//!
//! This is the primary storage backend for Hashmark. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use hashmark_core::{
    validate_record, validate_replacement, FingerprintRecord, PrimaryHash, RecordStatus,
    SecondaryHash,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::Ledger;

const COLUMNS: &str = "partition_key, row_key, sha256_hash, sha3_hash, original_filename,
    file_size, upload_timestamp, hash_algorithm_version, verification_count,
    last_verified, status, auto_deleted";

/// SQLite-based ledger implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteLedger {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    /// The ledger table, validated at open.
    table: Arc<str>,
}

impl SqliteLedger {
    /// Open a SQLite database at the given path, using `table` as the ledger.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn, table)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: Arc::from(table),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory(table: &str) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn, table)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: Arc::from(table),
        })
    }

    /// The ledger table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection, &str) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let table = self.table.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&mut conn, &table)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, Type::Text, e))
}

fn to_u64(idx: usize, value: i64) -> rusqlite::Result<u64> {
    u64::try_from(value).map_err(|e| conversion_error(idx, Type::Integer, e))
}

// Helper to convert a row (selected with COLUMNS) to a FingerprintRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<FingerprintRecord> {
    let primary: String = row.get(2)?;
    let secondary: String = row.get(3)?;
    let ingested: String = row.get(6)?;
    let last_verified: Option<String> = row.get(9)?;
    let status: String = row.get(10)?;

    Ok(FingerprintRecord {
        partition_key: row.get(0)?,
        row_key: row.get(1)?,
        primary_hash: PrimaryHash::parse(&primary).map_err(|e| conversion_error(2, Type::Text, e))?,
        secondary_hash: SecondaryHash::from_hex(&secondary)
            .map_err(|e| conversion_error(3, Type::Text, e))?,
        original_filename: row.get(4)?,
        file_size_bytes: to_u64(5, row.get(5)?)?,
        ingest_timestamp: parse_timestamp(6, &ingested)?,
        algorithm_version: row.get(7)?,
        verification_count: to_u64(8, row.get(8)?)?,
        last_verified: last_verified
            .map(|s| parse_timestamp(9, &s))
            .transpose()?,
        status: status
            .parse::<RecordStatus>()
            .map_err(|e| conversion_error(10, Type::Text, e))?,
        auto_deleted: row.get(11)?,
    })
}

fn to_i64(field: &str, value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{} out of range: {}", field, value)))
}

fn select_one(
    conn: &Connection,
    table: &str,
    partition_key: &str,
    row_key: &str,
) -> Result<Option<FingerprintRecord>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM {table} WHERE partition_key = ?1 AND row_key = ?2"
        ),
        params![partition_key, row_key],
        row_to_record,
    )
    .optional()
    .map_err(StoreError::from)
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn find_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> Result<Option<FingerprintRecord>> {
        let hash = hash.to_hex();

        self.run(move |conn, table| {
            conn.query_row(
                &format!(
                    "SELECT {COLUMNS} FROM {table} WHERE sha256_hash = ?1
                     ORDER BY partition_key, row_key LIMIT 1"
                ),
                params![hash],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn find_all_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> Result<Vec<FingerprintRecord>> {
        let hash = hash.to_hex();

        self.run(move |conn, table| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM {table} WHERE sha256_hash = ?1
                 ORDER BY partition_key, row_key"
            ))?;

            let records = stmt
                .query_map(params![hash], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(records)
        })
        .await
    }

    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<FingerprintRecord>> {
        let partition_key = partition_key.to_string();
        let row_key = row_key.to_string();

        self.run(move |conn, table| select_one(conn, table, &partition_key, &row_key))
            .await
    }

    async fn list_partition(&self, partition_key: &str) -> Result<Vec<FingerprintRecord>> {
        let partition_key = partition_key.to_string();

        self.run(move |conn, table| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM {table} WHERE partition_key = ?1 ORDER BY row_key"
            ))?;

            let records = stmt
                .query_map(params![partition_key], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(records)
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.run(|conn, table| {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn insert(&self, record: &FingerprintRecord) -> Result<()> {
        validate_record(record)?;
        let record = record.clone();

        self.run(move |conn, table| {
            let exists: bool = conn.query_row(
                &format!(
                    "SELECT EXISTS(SELECT 1 FROM {table} WHERE partition_key = ?1 AND row_key = ?2)"
                ),
                params![record.partition_key, record.row_key],
                |row| row.get(0),
            )?;

            if exists {
                return Err(StoreError::Conflict {
                    partition_key: record.partition_key,
                    row_key: record.row_key,
                });
            }

            conn.execute(
                &format!(
                    "INSERT INTO {table} ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                ),
                params![
                    record.partition_key,
                    record.row_key,
                    record.primary_hash.to_hex(),
                    record.secondary_hash.to_hex(),
                    record.original_filename,
                    to_i64("file_size", record.file_size_bytes)?,
                    format_timestamp(&record.ingest_timestamp),
                    record.algorithm_version,
                    to_i64("verification_count", record.verification_count)?,
                    record.last_verified.as_ref().map(format_timestamp),
                    record.status.as_str(),
                    record.auto_deleted,
                ],
            )?;

            Ok(())
        })
        .await
    }

    async fn replace(&self, record: &FingerprintRecord) -> Result<()> {
        let record = record.clone();

        self.run(move |conn, table| {
            let tx = conn.transaction()?;

            let existing = select_one(&tx, table, &record.partition_key, &record.row_key)?
                .ok_or_else(|| StoreError::NotFound(record.key().to_string()))?;
            validate_replacement(&existing, &record)?;

            tx.execute(
                &format!(
                    "UPDATE {table} SET
                        sha256_hash = ?3, sha3_hash = ?4, original_filename = ?5,
                        file_size = ?6, upload_timestamp = ?7, hash_algorithm_version = ?8,
                        verification_count = ?9, last_verified = ?10, status = ?11,
                        auto_deleted = ?12
                     WHERE partition_key = ?1 AND row_key = ?2"
                ),
                params![
                    record.partition_key,
                    record.row_key,
                    record.primary_hash.to_hex(),
                    record.secondary_hash.to_hex(),
                    record.original_filename,
                    to_i64("file_size", record.file_size_bytes)?,
                    format_timestamp(&record.ingest_timestamp),
                    record.algorithm_version,
                    to_i64("verification_count", record.verification_count)?,
                    record.last_verified.as_ref().map(format_timestamp),
                    record.status.as_str(),
                    record.auto_deleted,
                ],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LedgerExt;
    use chrono::{Duration, TimeZone};
    use hashmark_core::fingerprint;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn make_record(content: &[u8], name: &str, when: DateTime<Utc>) -> FingerprintRecord {
        FingerprintRecord::new(&fingerprint(content), name, content.len() as u64, when)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let record = make_record(b"hello", "hello.txt", at(0));

        ledger.insert(&record).await.unwrap();

        let found = ledger
            .find_by_primary_hash(&record.primary_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, record);
        assert_eq!(ledger.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_hash() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let hash = fingerprint(b"never stored").primary;
        assert!(ledger.find_by_primary_hash(&hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_same_key_conflicts() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let record = make_record(b"hello", "hello.txt", at(0));

        ledger.insert(&record).await.unwrap();
        let result = ledger.insert(&record).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_hash_tie_break_is_earliest() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let later = make_record(b"hello", "second.txt", at(90));
        let earlier = make_record(b"hello", "first.txt", at(5));

        // Insert out of order: the lookup must not depend on insertion order
        ledger.insert(&later).await.unwrap();
        ledger.insert(&earlier).await.unwrap();

        let found = ledger
            .find_by_primary_hash(&earlier.primary_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.original_filename, "first.txt");

        let all = ledger
            .find_all_by_primary_hash(&earlier.primary_hash)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].original_filename, "second.txt");
    }

    #[tokio::test]
    async fn test_increment_verification_persists() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let record = make_record(b"hello", "hello.txt", at(0));
        ledger.insert(&record).await.unwrap();

        let updated = ledger.increment_verification(&record, at(60)).await.unwrap();
        assert_eq!(updated.verification_count, 1);
        assert_eq!(updated.last_verified, Some(at(60)));

        let stored = ledger
            .get(&record.partition_key, &record.row_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_replace_missing_record() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let record = make_record(b"hello", "hello.txt", at(0));
        let result = ledger.replace(&record).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replace_rejects_stale_counter() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let record = make_record(b"hello", "hello.txt", at(0));
        ledger.insert(&record).await.unwrap();

        let first = ledger.increment_verification(&record, at(1)).await.unwrap();
        ledger.increment_verification(&first, at(2)).await.unwrap();

        // A writer that read before both increments must not roll the counter back
        let stale = ledger.increment_verification(&record, at(3)).await;
        assert!(matches!(stale, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_partition() {
        let ledger = SqliteLedger::open_memory("fingerprints").unwrap();
        let a = make_record(b"a", "a.txt", at(0));
        let b = make_record(b"b", "b.txt", at(10));
        let next_day = make_record(b"c", "c.txt", at(86_400));

        for record in [&a, &b, &next_day] {
            ledger.insert(record).await.unwrap();
        }

        let day = ledger.list_partition("2026-01-14").await.unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].original_filename, "a.txt");

        let other = ledger.list_partition("2026-01-15").await.unwrap();
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let record = make_record(b"durable", "durable.bin", Utc::now());

        {
            let ledger = SqliteLedger::open(&path, "fingerprints").unwrap();
            ledger.insert(&record).await.unwrap();
        }

        let ledger = SqliteLedger::open(&path, "fingerprints").unwrap();
        let found = ledger
            .find_by_primary_hash(&record.primary_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, record);
    }

    #[test]
    fn test_open_rejects_bad_table_name() {
        let result = SqliteLedger::open_memory("bad; DROP TABLE x");
        assert!(matches!(result, Err(StoreError::InvalidTableName(_))));
    }
}
