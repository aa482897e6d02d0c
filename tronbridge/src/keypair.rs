//! secp256k1 key pairs.

use core::fmt;

use zeroize::Zeroizing;

use crate::address::{Address, AddressScheme};
use crate::curve::{compress_point, Curve, Secp256k1};
use crate::error::{Error, Result};

/// A private scalar and its uncompressed public point.
///
/// The public key is always computed from the private key, so the two can
/// never disagree. The private key is zeroized on drop.
#[derive(Clone)]
pub struct KeyPair {
    public_key: [u8; 65],
    private_key: Zeroizing<[u8; 32]>,
}

impl KeyPair {
    /// Build a key pair from 32 private key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the input is not 32 bytes or
    /// not a scalar in `[1, n)`.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self> {
        Self::from_private_key_with(&Secp256k1, private_key)
    }

    /// Build a key pair using a specific curve backend.
    pub fn from_private_key_with<C: Curve>(curve: &C, private_key: &[u8]) -> Result<Self> {
        let secret = Zeroizing::new(
            <[u8; 32]>::try_from(private_key).map_err(|_| Error::InvalidPrivateKey)?,
        );
        let public_key = curve
            .uncompressed_public_key(&secret)
            .map_err(|_| Error::InvalidPrivateKey)?;

        Ok(Self {
            public_key,
            private_key: secret,
        })
    }

    /// Build a key pair from a hex private key, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecode`] for malformed hex and
    /// [`Error::InvalidPrivateKey`] for a bad length or out-of-range scalar.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self> {
        let trimmed = private_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(digits)?);
        Self::from_private_key(&bytes)
    }

    /// 65-byte uncompressed public key, `0x04 ‖ X ‖ Y`.
    #[inline]
    pub const fn public_key(&self) -> &[u8; 65] {
        &self.public_key
    }

    /// 33-byte compressed public key.
    pub fn compressed_public_key(&self) -> [u8; 33] {
        compress_point(&self.public_key)
    }

    /// Raw private key bytes.
    #[inline]
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Public key as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// Private key as lowercase hex.
    ///
    /// **Security Warning**: handle the returned string with care.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(*self.private_key))
    }

    /// Address of this key pair.
    pub fn address(&self, version: u8, scheme: AddressScheme) -> Result<Address> {
        Address::from_public_key(&self.public_key, version, scheme)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
