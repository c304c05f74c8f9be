//! `data:<mime>;base64,<payload>` helpers for binary records.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encode raw bytes as a base64 data URI.
#[must_use]
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("{DATA_PREFIX}{mime_type}{BASE64_MARKER}{}", STANDARD.encode(bytes))
}

/// Split a data URI into `(mime type, base64 payload)`.
#[must_use]
pub fn split_data_uri(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DATA_PREFIX)?;
    rest.split_once(BASE64_MARKER)
}

/// Decode a data URI back into raw bytes.
#[must_use]
pub fn decode_data_uri(content: &str) -> Option<Vec<u8>> {
    let (_, payload) = split_data_uri(content)?;
    STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let uri = encode_data_uri("image/png", b"foo");
        assert_eq!(uri, "data:image/png;base64,Zm9v");
        assert_eq!(split_data_uri(&uri), Some(("image/png", "Zm9v")));
        assert_eq!(decode_data_uri(&uri).as_deref(), Some(&b"foo"[..]));
    }

    #[test]
    fn test_rejects_non_uri() {
        assert!(split_data_uri("plain").is_none());
        assert!(decode_data_uri("data:image/png,raw").is_none());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_none());
    }
}
