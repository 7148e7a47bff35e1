//! Unpadded base64url, as used by compact JWS segments.

use crate::CryptoError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub fn b64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode an unpadded base64url segment. Trailing `=` padding is tolerated.
pub fn b64url_decode(segment: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| CryptoError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_padding() {
        assert_eq!(b64url_encode(b"ab"), "YWI");
        assert_eq!(b64url_encode(&[0xfb, 0xff]), "-_8");
    }

    #[test]
    fn decode_accepts_padding() {
        assert_eq!(b64url_decode("YWI=").unwrap(), b"ab");
        assert_eq!(b64url_decode("YWI").unwrap(), b"ab");
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(b64url_decode("+/8").is_err());
    }
}
