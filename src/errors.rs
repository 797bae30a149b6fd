//! When something goes wrong

use thiserror::Error as ThisError;

use crate::CurveId;

/// Any error returned by the engine
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// Malformed constructor argument
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// A hardened step was requested on a node without private key
    #[error("hardened derivation requires a private key")]
    PrivateDerivationRequired,
    /// Non-hardened derivation was requested on a curve that only supports hardened derivation
    #[error("non-hardened derivation is not supported on {curve}")]
    UnsupportedDerivation {
        /// Curve of the node
        curve: CurveId,
    },
    /// Child would be deeper than 255 levels
    #[error("derivation depth cannot exceed 255")]
    DepthOverflow,
    /// Derivation path could not be parsed
    #[error(transparent)]
    PathSyntax(#[from] PathSyntaxError),
    /// Extended key could not be parsed
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    /// Node could not be serialized as extended key
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Constructor argument is not acceptable
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum InvalidInput {
    /// Seed must be 16-64 bytes long
    #[error("seed must be 16-64 bytes long, got {0} bytes")]
    SeedLength(usize),
    /// Buffer has unexpected length
    #[error(transparent)]
    Length(#[from] InvalidLength),
    /// Bytes do not encode a private key on the curve
    #[error("private key is not valid for {0}")]
    PrivateKey(CurveId),
    /// Bytes do not encode a public key on the curve
    #[error("public key is not valid for {0}")]
    PublicKey(CurveId),
    /// Explicit public key does not correspond to the private key
    #[error("public key does not match private key")]
    KeyPairMismatch,
    /// Network tag is not known
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
    /// Curve name is not known
    #[error("unknown curve `{0}`")]
    UnknownCurve(String),
    /// Depth 0 requires zero parent fingerprint and zero index
    #[error("root node must have zero parent fingerprint and zero index")]
    InconsistentRoot,
}

/// Length of the argument is not valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("invalid length: expected {expected} bytes, got {actual}")]
pub struct InvalidLength {
    /// Expected length
    pub expected: usize,
    /// Actual length
    pub actual: usize,
}

/// Value was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("out of range")]
pub struct OutOfRange;

/// Error returned by parsing child index
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ParseChildIndexError {
    /// Indicates that parsing an `u32` integer failed
    #[error("child index is not valid u32 integer")]
    ParseInt(#[source] core::num::ParseIntError),
    /// Parsed index was out of acceptable range
    #[error("child index is not in acceptable range")]
    IndexNotInRange(#[source] OutOfRange),
}

/// Derivation path does not match `m(/[0-9]+['hH]?)*`
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum PathSyntaxError {
    /// Path must start with `m`
    #[error("derivation path must start with `m`")]
    MissingRoot,
    /// Two separators in a row, or a trailing separator
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    /// Segment is not a decimal number with an optional hardened marker
    #[error("segment `{segment}` at position {position} is not a valid child index")]
    InvalidSegment {
        /// Position of the segment, `m` excluded
        position: usize,
        /// Segment text
        segment: String,
    },
    /// Index does not fit into 31 bits
    #[error("index {index} at position {position} must be less than 2^31")]
    IndexOutOfRange {
        /// Position of the segment, `m` excluded
        position: usize,
        /// Parsed index value
        index: u64,
    },
}

/// Extended key bytes are malformed
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum ParsingError {
    /// Text is not valid Base58Check
    #[error("invalid base58check encoding: {0}")]
    Base58(#[from] bs58::decode::Error),
    /// Extended key must be 78 bytes long
    #[error("extended key must be 78 bytes long, got {0}")]
    Length(usize),
    /// Version prefix is not in the table
    #[error("unknown version prefix {0:02x?}")]
    UnknownVersion([u8; 4]),
    /// Private key field must start with zero byte
    #[error("private key must be prefixed with zero byte, got {0:#04x}")]
    NonZeroPadding(u8),
    /// Key field is not a valid key, or root metadata is inconsistent
    #[error("invalid key material: {0}")]
    InvalidKey(#[source] InvalidInput),
}

/// Node cannot be serialized as extended key
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum SerializationError {
    /// Extended key encoding is only defined for secp256k1
    #[error("extended key encoding is not defined for {0}")]
    UnsupportedCurve(CurveId),
    /// Private serialization requested on public-only node
    #[error("node does not hold a private key")]
    MissingPrivateKey,
}
