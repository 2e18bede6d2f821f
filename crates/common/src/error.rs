use std::fmt;

use thiserror::Error;

/// Length class a hex field must satisfy, counted in hex digits after the `0x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedLength {
    /// Exactly this many digits (addresses and hashes).
    Exact(usize),
    /// Any even number of digits, including zero (raw byte strings).
    Even,
    /// At least this many digits (integers).
    AtLeast(usize),
}

impl fmt::Display for ExpectedLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exactly {n} hex digits"),
            Self::Even => f.write_str("an even number of hex digits"),
            Self::AtLeast(n) => write!(f, "at least {n} hex digit(s)"),
        }
    }
}

/// Reasons a raw log record could not be decoded.
///
/// Every variant names the wire key it was raised for. Failures are permanent for the
/// input that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required key is absent, `null`, or of the wrong JSON type.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The value lacks the `0x` prefix or contains non-hex characters.
    #[error("field `{0}` is not a 0x-prefixed hex string")]
    MalformedHex(&'static str),
    /// The hex digits do not satisfy the field's length class.
    #[error("field `{key}` has invalid length: expected {expected}, got {actual} hex digits")]
    InvalidLength {
        /// Wire key of the offending field.
        key: &'static str,
        /// Length class the field requires.
        expected: ExpectedLength,
        /// Number of hex digits received.
        actual: usize,
    },
    /// An entry of the `topics` array failed to decode.
    #[error("invalid topic at index {index}: {source}")]
    InvalidTopicEntry {
        /// Position of the entry within `topics`.
        index: usize,
        /// Why the entry was rejected.
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Returns the wire key this error was raised for.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MissingField(key) | Self::MalformedHex(key) => key,
            Self::InvalidLength { key, .. } => key,
            Self::InvalidTopicEntry { source, .. } => source.key(),
        }
    }
}
