//! Constant-time string comparison

use std::sync::OnceLock;

use hmac::digest::generic_array::GenericArray;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// One SHA-256 block worth of random key material
fn comparison_key() -> &'static [u8; 64] {
    static KEY: OnceLock<[u8; 64]> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut key = [0u8; 64];
        rand::rng().fill(&mut key);
        key
    })
}

fn mac(value: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new(GenericArray::from_slice(comparison_key()));
    mac.update(value.as_bytes());
    mac
}

/// Compare two secrets without leaking the position of the first difference.
///
/// Both inputs are MACed under a per-process random key and the digests are
/// checked with `verify_slice`, which compares in constant time. Input lengths
/// are hidden as well because the digests have a fixed size.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let expected = mac(b).finalize().into_bytes();
    mac(a).verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_strings_match() {
        assert!(constant_time_eq("token-value", "token-value"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_different_strings_do_not_match() {
        assert!(!constant_time_eq("token-value", "token-valuf"));
        assert!(!constant_time_eq("token-value", "token-value-longer"));
        assert!(!constant_time_eq("", "x"));
    }

    #[test]
    fn test_key_is_random_and_stable() {
        let key = comparison_key();

        assert!(key.iter().any(|b| *b != 0));
        assert_eq!(key, comparison_key());
        assert_ne!(key[..32], key[32..]);
    }
}
