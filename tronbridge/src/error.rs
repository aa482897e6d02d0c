//! Error types for account derivation.
//!
//! Every fallible operation in the crate returns [`Error`]. The variants form a
//! closed set so callers can branch on the kind instead of parsing messages.

use std::fmt;

/// Errors that can occur while generating, deriving or encoding an account.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Requested entropy size is not supported.
    InvalidBitSize(usize),
    /// Mnemonic phrase failed wordlist or checksum validation.
    InvalidMnemonicPhrase,
    /// Derivation path has no components.
    InvalidChildKeyPath(String),
    /// A derivation path component is not a valid index.
    InvalidPathComponent {
        /// The full path being parsed.
        path: String,
        /// The offending component.
        component: String,
    },
    /// Seed length is outside the BIP-32 range of 16 to 64 bytes.
    InvalidSeedLength(usize),
    /// Master key landed on an invalid scalar.
    KeyGeneration,
    /// A child key landed on an invalid scalar.
    Derivation {
        /// Path of the parent key.
        path: String,
        /// Raw child index, including the hardened offset.
        index: u32,
    },
    /// Derivation would exceed the maximum tree depth of 255.
    DepthExceeded,
    /// Hardened child requested from a key without private material.
    HardenedFromPublic {
        /// Raw child index, including the hardened offset.
        index: u32,
    },
    /// Private material requested from a public-only key.
    KeyExtraction,
    /// Malformed or off-curve public key.
    InvalidPublicKey,
    /// Private key has the wrong length or is not a valid scalar.
    InvalidPrivateKey,
    /// Base58Check checksum does not match its payload.
    ChecksumMismatch,
    /// Base58 or address decoding failed.
    Decode(DecodeError),
    /// Malformed hex string.
    HexDecode(hex::FromHexError),
    /// The system random number generator failed.
    Entropy(rand_core::Error),
}

/// Reasons a Base58 string or address could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Character outside the Base58 alphabet.
    InvalidCharacter {
        /// The rejected character.
        character: char,
        /// Its position in the input.
        index: usize,
    },
    /// Input could not be decoded for another reason (e.g. non-ASCII).
    Malformed,
    /// Decoded data is too short to carry a checksum.
    TooShort(usize),
    /// Decoded payload has an unexpected length.
    InvalidLength {
        /// Expected payload length.
        expected: usize,
        /// Actual payload length.
        actual: usize,
    },
    /// Version byte does not match the expected network.
    UnexpectedVersion {
        /// Expected version byte.
        expected: u8,
        /// Version byte found in the input.
        actual: u8,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { character, index } => {
                write!(f, "invalid base58 character {character:?} at index {index}")
            }
            Self::Malformed => write!(f, "malformed base58 string"),
            Self::TooShort(len) => write!(f, "decoded data too short ({len} bytes)"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid payload length {actual}, expected {expected}")
            }
            Self::UnexpectedVersion { expected, actual } => {
                write!(f, "unexpected version byte 0x{actual:02x}, expected 0x{expected:02x}")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitSize(n) => {
                write!(f, "invalid bit size {n}, must be 128, 160, 192, 224, or 256")
            }
            Self::InvalidMnemonicPhrase => write!(f, "invalid mnemonic phrase"),
            Self::InvalidChildKeyPath(path) => write!(f, "invalid child derivation path {path:?}"),
            Self::InvalidPathComponent { path, component } => {
                write!(f, "invalid component {component:?} in derivation path {path:?}")
            }
            Self::InvalidSeedLength(n) => {
                write!(f, "invalid seed length {n}, must be between 16 and 64 bytes")
            }
            Self::KeyGeneration => write!(f, "master key is not a valid secp256k1 scalar"),
            Self::Derivation { path, index } => {
                write!(f, "child {index} of {path} is not a valid secp256k1 scalar")
            }
            Self::DepthExceeded => write!(f, "maximum derivation depth of 255 exceeded"),
            Self::HardenedFromPublic { index } => {
                write!(f, "hardened child {index} requires a private parent key")
            }
            Self::KeyExtraction => write!(f, "extended key has no private key material"),
            Self::InvalidPublicKey => write!(f, "invalid public key"),
            Self::InvalidPrivateKey => write!(f, "invalid private key"),
            Self::ChecksumMismatch => write!(f, "base58check checksum mismatch"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::HexDecode(e) => write!(f, "hex decode error: {e}"),
            Self::Entropy(e) => write!(f, "entropy source failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::HexDecode(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::HexDecode(err)
    }
}

impl From<rand_core::Error> for Error {
    fn from(err: rand_core::Error) -> Self {
        Self::Entropy(err)
    }
}

/// A convenient Result type alias for tronbridge operations.
pub type Result<T> = core::result::Result<T, Error>;
