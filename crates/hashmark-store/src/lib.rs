//! # Hashmark Store
//!
//! The ledger: a keyed store of [`FingerprintRecord`]s, partitioned by ingest
//! date and queryable by fingerprint.
//!
//! ## Overview
//!
//! The [`Ledger`] trait keeps the ingest and verification services
//! storage-agnostic. The primary implementation is [`SqliteLedger`], with
//! [`MemoryLedger`] for tests.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The async trait for all ledger operations
//! - [`LedgerExt`] - Read-modify-write helpers built on [`Ledger`]
//! - [`SqliteLedger`] - SQLite-based persistent ledger
//! - [`MemoryLedger`] - In-memory ledger for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use hashmark_core::{fingerprint, FingerprintRecord};
//! use hashmark_store::{Ledger, SqliteLedger};
//!
//! async fn example() {
//!     let ledger = SqliteLedger::open("hashmark.db", "fingerprints").unwrap();
//!
//!     let fp = fingerprint(b"hello");
//!     let record = FingerprintRecord::new(&fp, "hello.txt", 5, Utc::now());
//!     ledger.insert(&record).await.unwrap();
//!
//!     let found = ledger.find_by_primary_hash(&fp.primary).await.unwrap();
//!     assert!(found.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No uniqueness on hash**: `insert` only refuses a taken
//!   `(partition_key, row_key)`. Deduplication is the caller's pre-insert lookup.
//! - **Deterministic tie-break**: if several records share a hash, lookups
//!   return the lowest `(partition_key, row_key)`, i.e. the earliest ingest.
//! - **Guarded replace**: `replace` refuses to change identity fields or lower
//!   the verification counter.
//!
//! [`FingerprintRecord`]: hashmark_core::FingerprintRecord

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryLedger;
pub use migration::validate_table_name;
pub use sqlite::SqliteLedger;
pub use traits::{Ledger, LedgerExt};
