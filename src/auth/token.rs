// src/auth/token.rs
use sha2::{Digest, Sha256};

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Constant-time-ish compare for hashes (simple and sufficient here).
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Compare a presented secret with the configured one via their digests,
/// so the comparison time does not depend on where they differ.
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    hashes_equal(&hash_token(presented), &hash_token(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let h1 = hash_token("hello");
        let h2 = hash_token("hello");
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_changes_with_input() {
        let h1 = hash_token("hello");
        let h2 = hash_token("hello!");
        assert_ne!(h1, h2);
    }

    #[test]
    fn hashes_equal_constant_time_style() {
        let a = hash_token("abc");
        let b = hash_token("abc");
        let c = hash_token("abd");

        assert!(hashes_equal(&a, &b));
        assert!(!hashes_equal(&a, &c));
        assert!(!hashes_equal(&a, &c[..16]));
    }

    #[test]
    fn tokens_match_only_on_equal_secrets() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cret ", "s3cret"));
        assert!(!tokens_match("", "s3cret"));
    }
}
