//! The fingerprint engine: two independent digests over raw content.
//!
//! SHA-256 is the primary digest and the identity of a file's content.
//! SHA3-256 comes from a different hash family (Keccak sponge rather than
//! Merkle-Damgard) and is recorded for auditability only.

use sha2::Sha256;
use sha3::{Digest, Sha3_256};

use crate::types::{PrimaryHash, SecondaryHash};

/// Version tag of the fingerprinting scheme written into every record.
pub const ALGORITHM_VERSION: &str = "1.0";

/// Name of the primary digest algorithm.
pub const PRIMARY_ALGORITHM: &str = "sha256";

/// Name of the secondary digest algorithm.
pub const SECONDARY_ALGORITHM: &str = "sha3-256";

/// The digest pair computed over a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// SHA-256 of the content.
    pub primary: PrimaryHash,
    /// SHA3-256 of the content.
    pub secondary: SecondaryHash,
}

impl Fingerprint {
    /// Compute the fingerprint of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = FingerprintHasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Compute the fingerprint of the given data.
///
/// Deterministic and total: every byte sequence, including the empty one,
/// has a defined fingerprint.
pub fn fingerprint(data: &[u8]) -> Fingerprint {
    Fingerprint::compute(data)
}

/// Incremental fingerprint computation.
///
/// Feeding the same bytes in any chunking yields the same result as
/// [`fingerprint`] over the concatenation.
#[derive(Clone, Default)]
pub struct FingerprintHasher {
    primary: Sha256,
    secondary: Sha3_256,
}

impl FingerprintHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more content.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.primary.update(data);
        self.secondary.update(data);
        self
    }

    /// Finish and return the digest pair.
    pub fn finalize(self) -> Fingerprint {
        Fingerprint {
            primary: PrimaryHash::from_bytes(self.primary.finalize().into()),
            secondary: SecondaryHash::from_bytes(self.secondary.finalize().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digests_hello() {
        let fp = fingerprint(b"hello");
        assert_eq!(
            fp.primary.to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(
            fp.secondary.to_hex(),
            "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392"
        );
    }

    #[test]
    fn test_empty_input_has_defined_digest() {
        let fp = fingerprint(b"");
        assert_eq!(
            fp.primary.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            fp.secondary.to_hex(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_digests_are_independent() {
        let fp = fingerprint(b"abc");
        assert_ne!(fp.primary.as_bytes(), fp.secondary.as_bytes());
    }

    proptest! {
        #[test]
        fn test_fingerprint_deterministic(data in prop::collection::vec(any::<u8>(), 0..4096)) {
            prop_assert_eq!(fingerprint(&data), fingerprint(&data));
        }

        #[test]
        fn test_incremental_matches_one_shot(
            data in prop::collection::vec(any::<u8>(), 0..4096),
            split in any::<prop::sample::Index>(),
        ) {
            let at = split.index(data.len() + 1);
            let mut hasher = FingerprintHasher::new();
            hasher.update(&data[..at]).update(&data[at..]);
            prop_assert_eq!(hasher.finalize(), fingerprint(&data));
        }

        #[test]
        fn test_distinct_content_distinct_primary(
            a in prop::collection::vec(any::<u8>(), 0..256),
            b in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(fingerprint(&a).primary, fingerprint(&b).primary);
        }
    }
}
