//! Key exchange.
//!
//! The accept key is `base64(sha1(sec_key ++ GUID))`. SHA-1 is mandated
//! by RFC-6455 for interoperability, it plays no security role here.
//! A fresh hasher is built per call, so concurrent connections need no
//! shared digest state.

use super::GUID;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};

/// Generate a new `sec-websocket-key`: 16 random bytes, base64-encoded.
#[inline]
pub fn new_sec_key() -> [u8; 24] {
    let input: [u8; 16] = rand::random();
    let mut output = [0_u8; 24];
    STANDARD.encode_slice(input, &mut output).unwrap();
    output
}

/// Derive `sec-websocket-accept` from `sec-websocket-key`.
#[inline]
pub fn accept_key(sec_key: &[u8]) -> [u8; 28] {
    let mut sha1 = Sha1::new();
    sha1.update(sec_key);
    sha1.update(GUID);
    let digest = sha1.finalize();

    let mut output = [0_u8; 28];
    STANDARD.encode_slice(digest, &mut output).unwrap();
    output
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_sec_key() {
        for _ in 0..=1024 {
            // base64 alphabet, trailing padding
            let key = new_sec_key();
            assert!(key[..22]
                .iter()
                .all(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/'));
            assert_eq!(&key[22..], b"==");
        }
    }

    #[test]
    fn derive_accept_key() {
        // the RFC-6455 worked example
        assert_eq!(
            &accept_key(b"dGhlIHNhbXBsZSBub25jZQ=="),
            b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }
}
