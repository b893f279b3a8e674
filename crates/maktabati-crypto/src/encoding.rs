use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::password::{CryptoError, CryptoResult};

/// Standard (padded) base64, the alphabet used for stored hashes, salts and
/// exported file bodies.
pub fn encode_b64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn decode_b64(text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_encoding() {
        assert_eq!(encode_b64(b"Hello World"), "SGVsbG8gV29ybGQ=");
        assert_eq!(decode_b64("SGVsbG8gV29ybGQ=").unwrap(), b"Hello World");
    }

    #[test]
    fn empty_input() {
        assert_eq!(encode_b64(&[]), "");
        assert!(decode_b64("").unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_b64("not*base64"), Err(CryptoError::InvalidBase64(_))));
    }
}
