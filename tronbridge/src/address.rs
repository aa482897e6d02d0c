//! TRON address encoding.
//!
//! A TRON address is the last 20 bytes of Keccak-256 over the 64-byte public
//! point `X ‖ Y`, prefixed with the network version byte (`0x41` on mainnet)
//! and encoded with Base58Check. Mainnet addresses start with `T`.

use core::fmt;
use core::str::FromStr;

use crate::base58;
use crate::chain::TRON_VERSION_BYTE;
use crate::curve::compress_point;
use crate::error::{DecodeError, Error, Result};
use crate::hash::keccak256;
use crate::keypair::KeyPair;

/// Length of an address payload in bytes.
pub const PAYLOAD_LEN: usize = 20;

/// How the 20-byte payload is computed from a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressScheme {
    /// Keccak-256 over the 64-byte uncompressed point without its `0x04`
    /// prefix. This is the address every TRON wallet and node uses.
    #[default]
    Keccak,
    /// Keccak-256 over the ASCII hex text of the compressed point with its
    /// first hex digit removed.
    ///
    /// Kept to reproduce addresses issued by earlier releases of this tool.
    /// These addresses are well formed but are not the on-chain owner of the
    /// key.
    CompressedHex,
}

impl AddressScheme {
    /// Compute the address payload for a 65-byte uncompressed public key.
    pub fn payload(self, public_key: &[u8; 65]) -> [u8; PAYLOAD_LEN] {
        let hash = match self {
            Self::Keccak => keccak256(&public_key[1..]),
            Self::CompressedHex => {
                let text = hex::encode(compress_point(public_key));
                keccak256(text[1..].as_bytes())
            }
        };

        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&hash[32 - PAYLOAD_LEN..]);
        payload
    }
}

/// An encoded address together with its raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    payload: [u8; PAYLOAD_LEN],
    version: u8,
    encoded: String,
}

impl Address {
    /// Build an address from a payload and version byte.
    pub fn from_payload(payload: [u8; PAYLOAD_LEN], version: u8) -> Self {
        Self {
            encoded: base58::check_encode(&payload, version),
            payload,
            version,
        }
    }

    /// Derive an address from a 65-byte uncompressed public key.
    ///
    /// The key is only checked for shape here; curve membership is
    /// established when the key pair is built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] unless the key is 65 bytes starting
    /// with `0x04`.
    pub fn from_public_key(public_key: &[u8], version: u8, scheme: AddressScheme) -> Result<Self> {
        let public_key: &[u8; 65] = public_key
            .try_into()
            .map_err(|_| Error::InvalidPublicKey)?;
        if public_key[0] != 0x04 {
            return Err(Error::InvalidPublicKey);
        }
        Ok(Self::from_payload(scheme.payload(public_key), version))
    }

    /// Decode a Base58Check address, requiring the given version byte.
    ///
    /// # Errors
    ///
    /// - [`Error::Decode`] for bad characters, wrong payload length or an
    ///   unexpected version byte.
    /// - [`Error::ChecksumMismatch`] if the checksum does not match.
    pub fn parse(address: &str, version: u8) -> Result<Self> {
        let (payload, actual) = base58::check_decode(address)?;
        let payload = <[u8; PAYLOAD_LEN]>::try_from(payload.as_slice()).map_err(|_| {
            DecodeError::InvalidLength {
                expected: PAYLOAD_LEN,
                actual: payload.len(),
            }
        })?;
        if actual != version {
            return Err(DecodeError::UnexpectedVersion {
                expected: version,
                actual,
            }
            .into());
        }
        Ok(Self::from_payload(payload, version))
    }

    /// The 20-byte payload.
    #[inline]
    pub const fn payload(&self) -> &[u8; PAYLOAD_LEN] {
        &self.payload
    }

    /// The version byte.
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// The Base58Check string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Hex form used by TRON node APIs: version byte followed by the payload.
    pub fn to_hex(&self) -> String {
        let mut bytes = [0u8; PAYLOAD_LEN + 1];
        bytes[0] = self.version;
        bytes[1..].copy_from_slice(&self.payload);
        hex::encode(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Parse a TRON mainnet address.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, TRON_VERSION_BYTE)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

/// Encode a 65-byte uncompressed public key as a standard address.
pub fn public_key_to_address(public_key: &[u8], version: u8) -> Result<Address> {
    Address::from_public_key(public_key, version, AddressScheme::Keccak)
}

/// Encode the address of a hex private key (optional `0x` prefix).
///
/// # Errors
///
/// Returns [`Error::HexDecode`] for malformed hex and
/// [`Error::InvalidPrivateKey`] for a bad length or out-of-range scalar.
pub fn address_from_private_key(private_key: &str, version: u8) -> Result<String> {
    address_from_private_key_with(private_key, version, AddressScheme::Keccak)
}

/// Like [`address_from_private_key`], with an explicit payload scheme.
pub fn address_from_private_key_with(
    private_key: &str,
    version: u8,
    scheme: AddressScheme,
) -> Result<String> {
    let pair = KeyPair::from_private_key_hex(private_key)?;
    Ok(pair.address(version, scheme)?.encoded)
}
