//! Golden digest vectors.
//!
//! Published SHA-256 / SHA3-256 values for fixed inputs. A ledger written by
//! one build must be verifiable by any other, so these never change.

use hashmark_core::fingerprint;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input bytes.
    pub input: Vec<u8>,
    /// Expected SHA-256 (hex).
    pub sha256: &'static str,
    /// Expected SHA3-256 (hex).
    pub sha3: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty input",
            input: Vec::new(),
            sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sha3: "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a",
        },
        GoldenVector {
            name: "hello",
            input: b"hello".to_vec(),
            sha256: "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            sha3: "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392",
        },
        GoldenVector {
            name: "abc",
            input: b"abc".to_vec(),
            sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            sha3: "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
        },
        GoldenVector {
            name: "quick brown fox",
            input: b"The quick brown fox jumps over the lazy dog".to_vec(),
            sha256: "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592",
            sha3: "69070dda01975c8c120c3aada1b282394e7f032fa9cf32f4cb2259a0897dfc04",
        },
        GoldenVector {
            name: "every byte value",
            input: (0u8..=255).collect(),
            sha256: "40aff2e9d2d8922e47afd4648e6967497158785fbd1da870e7110266bf944880",
            sha3: "9b04c091da96b997afb8f2585d608aebe9c4a904f7d52c8f28c7e4d2dd9fba5f",
        },
        GoldenVector {
            name: "one million a",
            input: vec![b'a'; 1_000_000],
            sha256: "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0",
            sha3: "5c8875ae474a3634ba4fd55ec85bffd661f32aca75c6d699d0cdcb6c115891c1",
        },
    ]
}

/// Check every vector against the fingerprint engine.
///
/// Returns `(name, matches, computed sha256)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let fp = fingerprint(&v.input);
            let sha256 = fp.primary.to_hex();
            let matches = sha256 == v.sha256 && fp.secondary.to_hex() == v.sha3;
            (v.name.to_string(), matches, sha256)
        })
        .collect()
}
