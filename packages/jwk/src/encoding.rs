//! Base64 helpers for JWK binary parameters

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{JwkError, JwkResult};

/// URL-safe alphabet, never pads on encode, tolerates stray padding on decode
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url
#[must_use]
pub fn encode_url(bytes: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Decode a base64url value; `name` only feeds the error message
pub fn decode_url(name: &str, value: &str) -> JwkResult<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(value)
        .map_err(|e| JwkError::malformed(format!("parameter \"{name}\" is not base64url: {e}")))
}

/// Standard padded base64, as used by `x5c` entries
#[must_use]
pub fn encode_standard(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_has_no_padding() {
        assert_eq!(encode_url(&[0xff, 0xee]), "_-4");
    }

    #[test]
    fn test_decode_accepts_padded_and_unpadded() {
        assert_eq!(decode_url("k", "AQAB").ok(), Some(vec![1, 0, 1]));
        assert_eq!(decode_url("k", "AQ").ok(), Some(vec![1]));
        assert_eq!(decode_url("k", "AQ==").ok(), Some(vec![1]));
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        let err = decode_url("n", "a+b/").unwrap_err();
        assert!(matches!(err, JwkError::MalformedKey(msg) if msg.contains("\"n\"")));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_url_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let encoded = encode_url(&bytes);
                prop_assert!(!encoded.contains('='));
                prop_assert!(!encoded.contains('+') && !encoded.contains('/'));
                prop_assert_eq!(decode_url("k", &encoded).unwrap(), bytes);
            }

            #[test]
            fn test_padding_is_ignored(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
                let mut padded = encode_url(&bytes);
                while padded.len() % 4 != 0 {
                    padded.push('=');
                }
                prop_assert_eq!(decode_url("k", &padded).unwrap(), bytes);
            }
        }
    }
}
