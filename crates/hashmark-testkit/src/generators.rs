//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use hashmark_core::{Fingerprint, FingerprintRecord, PrimaryHash, HASH_HEX_LEN};

/// Generate file content of at most `max_len` bytes, empty included.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a plain file name.
pub fn file_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,23}\\.(txt|pdf|bin|png)".prop_map(String::from)
}

/// Generate a trigger-style name, sometimes with a container prefix.
pub fn staged_name() -> impl Strategy<Value = String> {
    (prop::option::of("[a-z]{3,10}"), file_name()).prop_map(|(container, name)| match container {
        Some(container) => format!("{}/{}", container, name),
        None => name,
    })
}

/// Generate a random PrimaryHash.
pub fn primary_hash() -> impl Strategy<Value = PrimaryHash> {
    any::<[u8; 32]>().prop_map(PrimaryHash::from_bytes)
}

/// Generate a well-formed hash string, in either case.
pub fn hash_string() -> impl Strategy<Value = String> {
    (any::<[u8; 32]>(), any::<bool>()).prop_map(|(bytes, upper)| {
        let hex = hex::encode(bytes);
        if upper {
            hex.to_uppercase()
        } else {
            hex
        }
    })
}

/// Generate a hex string of any length except 64.
pub fn wrong_length_hash() -> impl Strategy<Value = String> {
    "[0-9a-f]{0,200}".prop_filter("must not be a valid length", |s| s.len() != HASH_HEX_LEN)
}

/// Generate a 64-character string containing at least one non-hex character.
pub fn non_hex_hash() -> impl Strategy<Value = String> {
    ("[0-9a-f]{63}", "[g-zG-Z !#%]", 0usize..HASH_HEX_LEN).prop_map(|(hex, bad, at)| {
        let mut s = hex;
        s.insert_str(at, &bad);
        s
    })
}

/// Generate an ingest time between 2001 and 2100.
pub fn ingest_time() -> impl Strategy<Value = DateTime<Utc>> {
    (1_000_000_000i64..4_102_444_800i64).prop_map(|secs| {
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    })
}

/// Parameters for generating a record.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub content: Vec<u8>,
    pub name: String,
    pub ingested_at: DateTime<Utc>,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (content(1024), staged_name(), ingest_time())
            .prop_map(|(content, name, ingested_at)| RecordParams {
                content,
                name,
                ingested_at,
            })
            .boxed()
    }
}

/// Generate a record from parameters.
pub fn record_from_params(params: &RecordParams) -> FingerprintRecord {
    FingerprintRecord::new(
        &Fingerprint::compute(&params.content),
        params.name.clone(),
        params.content.len() as u64,
        params.ingested_at,
    )
}
