//! Encoding of ordered string lists into a single text column.
//!
//! Tags and blockers are stored as one `TEXT` value each. The encoding lives
//! behind [`ListCodec`] so the storage layer never calls `serde_json` for
//! list columns directly.

/// Canonical encoding of an empty list for [`JsonListCodec`].
pub const EMPTY_LIST: &str = "[]";

/// Errors produced while encoding or decoding a list column.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The list could not be encoded.
    #[error("failed to encode list: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored text is not a well-formed encoding of a string list.
    #[error("malformed list encoding {input:?}: {source}")]
    Decode {
        /// The text that failed to decode.
        input: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Converts ordered string lists to and from text.
///
/// Implementations must be lossless: `decode(encode(l)) == l` for every list,
/// including the empty list and lists with empty-string elements. The empty
/// list encodes to [`ListCodec::empty_token`], never to an empty string.
pub trait ListCodec: Send + Sync {
    /// Encodes a list.
    fn encode(&self, items: &[String]) -> Result<String, CodecError>;

    /// Decodes text produced by [`ListCodec::encode`].
    fn decode(&self, text: &str) -> Result<Vec<String>, CodecError>;

    /// The text stored for an empty list.
    fn empty_token(&self) -> &'static str;
}

/// JSON array encoding (`["a","b"]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonListCodec;

impl ListCodec for JsonListCodec {
    fn encode(&self, items: &[String]) -> Result<String, CodecError> {
        if items.is_empty() {
            return Ok(EMPTY_LIST.to_string());
        }
        serde_json::to_string(items).map_err(CodecError::Encode)
    }

    fn decode(&self, text: &str) -> Result<Vec<String>, CodecError> {
        serde_json::from_str(text).map_err(|source| CodecError::Decode {
            input: text.to_string(),
            source,
        })
    }

    fn empty_token(&self) -> &'static str {
        EMPTY_LIST
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roundtrip(items: &[&str]) -> Vec<String> {
        let codec = JsonListCodec;
        let list: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let text = codec.encode(&list).unwrap();
        codec.decode(&text).unwrap()
    }

    #[test]
    fn empty_list_uses_canonical_token() {
        let codec = JsonListCodec;
        assert_eq!(codec.encode(&[]).unwrap(), "[]");
        assert_eq!(codec.empty_token(), "[]");
        assert!(codec.decode("[]").unwrap().is_empty());
    }

    #[test]
    fn preserves_order_and_awkward_content() {
        let items = ["zeta", "", "alpha", "with \"quotes\"", "comma,inside", "ünïcødé 🚀"];
        assert_eq!(roundtrip(&items), items.to_vec());
    }

    #[test]
    fn list_of_only_empty_strings() {
        assert_eq!(roundtrip(&["", ""]), vec![String::new(), String::new()]);
    }

    #[test]
    fn encoding_is_json_array() {
        let codec = JsonListCodec;
        let text = codec
            .encode(&["backend".to_string(), "urgent".to_string()])
            .unwrap();
        assert_eq!(text, r#"["backend","urgent"]"#);
    }

    #[test]
    fn rejects_malformed_text() {
        let codec = JsonListCodec;
        for bad in ["", "not json", "{\"a\":1}", "[1,2]", "[\"open\""] {
            match codec.decode(bad) {
                Err(CodecError::Decode { input, .. }) => assert_eq!(input, bad),
                other => panic!("expected Decode error for {bad:?}, got {other:?}"),
            }
        }
    }
}
