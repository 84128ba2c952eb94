//! # Hashmark Core
//!
//! Pure primitives for Hashmark: content fingerprints and the ledger record
//! that proves a file existed at a given time.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over digests and record values.
//!
//! ## Key Types
//!
//! - [`Fingerprint`] - The SHA-256 / SHA3-256 digest pair of some content
//! - [`PrimaryHash`] - The SHA-256 digest, the canonical lookup key
//! - [`SecondaryHash`] - The SHA3-256 digest, kept for auditability
//! - [`FingerprintRecord`] - The unit of truth stored in the ledger
//! - [`RecordKey`] - Date partition + timestamp/hash row key
//!
//! ## Determinism
//!
//! [`fingerprint`] is a pure function of its input. There is no salt and no
//! per-instance state, so the same bytes hash identically across restarts.

pub mod error;
pub mod fingerprint;
pub mod record;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use fingerprint::{
    fingerprint, Fingerprint, FingerprintHasher, ALGORITHM_VERSION, PRIMARY_ALGORITHM,
    SECONDARY_ALGORITHM,
};
pub use record::{partition_key_for, row_key_for, FingerprintRecord, RecordKey, RecordStatus};
pub use types::{PrimaryHash, SecondaryHash, HASH_HEX_LEN};
pub use validation::{validate_record, validate_replacement};
