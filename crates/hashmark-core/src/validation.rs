//! Record validation: structural checks and replacement rules.

use crate::error::ValidationError;
use crate::record::{partition_key_for, row_key_for, FingerprintRecord};

/// Validate a record's structure.
///
/// This performs:
/// - Partition key matches the ingest date
/// - Row key matches the ingest second and hash prefix
/// - Algorithm version is present
pub fn validate_record(record: &FingerprintRecord) -> Result<(), ValidationError> {
    let expected = partition_key_for(record.ingest_timestamp);
    if record.partition_key != expected {
        return Err(ValidationError::PartitionKeyMismatch {
            expected,
            got: record.partition_key.clone(),
        });
    }

    let expected = row_key_for(record.ingest_timestamp, &record.primary_hash);
    if record.row_key != expected {
        return Err(ValidationError::RowKeyMismatch {
            expected,
            got: record.row_key.clone(),
        });
    }

    if record.algorithm_version.is_empty() {
        return Err(ValidationError::MissingAlgorithmVersion);
    }

    Ok(())
}

/// Validate that `replacement` may overwrite `existing`.
///
/// Identity fields are immutable and the verification counter never goes
/// backwards. A stale read-modify-write that would lower the counter is
/// rejected here rather than silently applied.
pub fn validate_replacement(
    existing: &FingerprintRecord,
    replacement: &FingerprintRecord,
) -> Result<(), ValidationError> {
    let identity: [(&'static str, bool); 9] = [
        ("partition_key", existing.partition_key == replacement.partition_key),
        ("row_key", existing.row_key == replacement.row_key),
        ("sha256_hash", existing.primary_hash == replacement.primary_hash),
        ("sha3_hash", existing.secondary_hash == replacement.secondary_hash),
        (
            "original_filename",
            existing.original_filename == replacement.original_filename,
        ),
        ("file_size", existing.file_size_bytes == replacement.file_size_bytes),
        (
            "upload_timestamp",
            existing.ingest_timestamp == replacement.ingest_timestamp,
        ),
        (
            "hash_algorithm_version",
            existing.algorithm_version == replacement.algorithm_version,
        ),
        ("status", existing.status == replacement.status),
    ];

    if let Some((field, _)) = identity.iter().find(|(_, same)| !same) {
        return Err(ValidationError::IdentityChanged(*field));
    }

    if replacement.verification_count < existing.verification_count {
        return Err(ValidationError::CounterDecreased {
            from: existing.verification_count,
            to: replacement.verification_count,
        });
    }

    Ok(())
}
