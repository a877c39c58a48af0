//! The 32-byte lookup key for traces.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tontrace_cell::CellHash;

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);
const URL_SAFE_LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);

/// Decode base64 in either alphabet, with or without `=` padding.
pub(crate) fn decode_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if input.contains(['-', '_']) {
        URL_SAFE_LENIENT.decode(input)
    } else {
        STANDARD_LENIENT.decode(input)
    }
}

/// A message hash used as an indexer lookup key.
///
/// Rendered as padded standard base64, which is what trace indexers accept
/// as `ext_msg_hash` / `trace_id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedHash(pub [u8; 32]);

impl NormalizedHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<CellHash> for NormalizedHash {
    fn from(hash: CellHash) -> Self {
        Self(hash.0)
    }
}

impl fmt::Display for NormalizedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for NormalizedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NormalizedHash({})", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hash `{input}`: {reason}")]
pub struct ParseHashError {
    pub input: String,
    pub reason: String,
}

impl FromStr for NormalizedHash {
    type Err = ParseHashError;

    /// Accepts 64 hex digits, or base64 in either alphabet, padded or not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let fail = |reason: String| ParseHashError {
            input: input.to_string(),
            reason,
        };

        let bytes = if input.len() == 64 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            hex::decode(input).map_err(|e| fail(e.to_string()))?
        } else {
            decode_base64(input).map_err(|e| fail(e.to_string()))?
        };

        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| fail(format!("expected 32 bytes, got {}", b.len())))?;
        Ok(Self(bytes))
    }
}

impl Serialize for NormalizedHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for NormalizedHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    #[test]
    fn parses_every_accepted_encoding() {
        let hash = NormalizedHash([0xFB; 32]);
        let standard = hash.to_base64();
        assert!(standard.contains('+') || standard.contains('/'));
        let url_safe = URL_SAFE_NO_PAD.encode(hash.0);

        assert_eq!(standard.parse::<NormalizedHash>().expect("standard"), hash);
        assert_eq!(url_safe.parse::<NormalizedHash>().expect("url-safe"), hash);
        assert_eq!(hash.to_hex().parse::<NormalizedHash>().expect("hex"), hash);
    }

    #[test]
    fn padding_is_optional_in_both_alphabets() {
        let hash = NormalizedHash([0xFB; 32]);
        let padded = hash.to_base64();
        assert!(padded.ends_with('='));
        let unpadded = padded.trim_end_matches('=');

        assert_eq!(unpadded.parse::<NormalizedHash>().expect("unpadded"), hash);
        let padded_url_safe = URL_SAFE.encode(hash.0);
        assert_eq!(
            padded_url_safe.parse::<NormalizedHash>().expect("padded url-safe"),
            hash
        );
    }

    #[test]
    fn rejects_wrong_length() {
        let err = STANDARD
            .encode([0u8; 16])
            .parse::<NormalizedHash>()
            .unwrap_err();
        assert_eq!(err.reason, "expected 32 bytes, got 16");
    }

    #[test]
    fn serializes_as_base64_string() {
        let hash = NormalizedHash([0x01; 32]);
        let json = serde_json::to_string(&hash).expect("serialize");
        assert_eq!(json, format!("\"{}\"", hash.to_base64()));
        let back: NormalizedHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, hash);
    }
}
