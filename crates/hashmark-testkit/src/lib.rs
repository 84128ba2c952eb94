//! # Hashmark Testkit
//!
//! Testing utilities for Hashmark.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with their published SHA-256 / SHA3-256 digests
//! - **Generators**: Proptest strategies for content, names and hash strings
//! - **Fixtures**: A complete in-memory Hashmark for integration tests
//! - **Faults**: Ledger and staging wrappers that fail on demand and count calls
//!
//! ## Golden Vectors
//!
//! ```rust
//! use hashmark_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, sha256) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, sha256);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hashmark_testkit::generators::content;
//!
//! proptest! {
//!     #[test]
//!     fn fingerprint_is_deterministic(data in content(4096)) {
//!         prop_assert_eq!(hashmark_core::fingerprint(&data), hashmark_core::fingerprint(&data));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use hashmark_testkit::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let outcome = fixture.ingest("hello.txt", b"hello").await;
//!     assert!(outcome.staged_copy_removed);
//! }
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faults::{FlakyLedger, FlakyStaging};
pub use fixtures::TestFixture;
pub use generators::{record_from_params, RecordParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
