//! # Hashmark Staging
//!
//! The staging area holds uploaded bytes only until they are fingerprinted.
//! It is not the ledger: once an object has been recorded (or found to be a
//! duplicate) it is deleted.
//!
//! ## Key Types
//!
//! - [`StagingArea`] - The async trait the ingest pipeline reads and deletes through
//! - [`StagedObject`] - Name and length of one staged upload
//! - [`FsStaging`] - A directory on local disk
//! - [`MemoryStaging`] - In-memory staging for tests
//!
//! ## Object names
//!
//! Triggers may report names with a container prefix (`uploads/report.pdf`).
//! The area itself is addressed by the last path segment, see [`object_key`].

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{Result, StagingError};
pub use fs::FsStaging;
pub use memory::MemoryStaging;
pub use traits::{object_key, StagedObject, StagingArea};
