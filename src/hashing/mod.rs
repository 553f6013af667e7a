//! BLAKE3 helpers for candidate fingerprints and stub-model seeding.

use blake3::Hasher;

/// Hex-encoded BLAKE3 digest of a candidate text.
///
/// Stored next to a success result so a later run can tell whether the text under a
/// column changed since it was scored. Uses the full 256-bit output: a collision here
/// would silently keep stale metrics.
#[inline]
pub fn fingerprint_text(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// 64-bit BLAKE3 hash of `token` within `namespace`, truncated from 256 bits.
///
/// Only used to seed deterministic stub vectors, where a collision just means two tokens
/// share a pseudo-embedding.
#[inline]
pub fn hash_token(namespace: &str, token: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"|");
    hasher.update(token.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fingerprint_determinism() {
        let text = "O lucro cresceu.";
        assert_eq!(fingerprint_text(text), fingerprint_text(text));
    }

    #[test]
    fn test_fingerprint_uniqueness() {
        let texts = [
            "O lucro cresceu.",
            "O lucro cresceu",
            "o lucro cresceu.",
            "O lucro cresceu. ",
        ];

        let hashes: HashSet<_> = texts.iter().map(|t| fingerprint_text(t)).collect();
        assert_eq!(hashes.len(), texts.len());
    }

    #[test]
    fn test_fingerprint_is_hex_256() {
        let fp = fingerprint_text("abc");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_namespace_separation() {
        assert_ne!(hash_token("encoder", "lucro"), hash_token("aligner", "lucro"));
        assert_eq!(hash_token("encoder", "lucro"), hash_token("encoder", "lucro"));
    }

    #[test]
    fn test_hash_token_separator_prevents_ambiguity() {
        assert_ne!(hash_token("ab", "cd"), hash_token("abc", "d"));
    }
}
