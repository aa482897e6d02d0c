//! Network parameters.
//!
//! [`ChainParams`] bundles the values that differ between networks: the
//! address version byte, the BIP-44 coin type and the address scheme. The
//! default derivation path is the first BIP-44 address of the coin type.
//! Values are passed explicitly; nothing is read from the environment.

use core::fmt;

use crate::address::AddressScheme;
use crate::error::Result;
use crate::path::DerivationPath;

/// Address version byte of TRON mainnet.
pub const TRON_VERSION_BYTE: u8 = 0x41;

/// Registered BIP-44 coin type of TRON.
pub const TRON_COIN_TYPE: u32 = 195;

/// Immutable parameters of a TRON-style network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainParams {
    name: &'static str,
    version_byte: u8,
    coin_type: u32,
    address_scheme: AddressScheme,
}

impl ChainParams {
    /// TRON mainnet.
    pub const TRON: Self = Self {
        name: "tron",
        version_byte: TRON_VERSION_BYTE,
        coin_type: TRON_COIN_TYPE,
        address_scheme: AddressScheme::Keccak,
    };

    /// Custom network parameters.
    #[must_use]
    pub const fn new(name: &'static str, version_byte: u8, coin_type: u32) -> Self {
        Self {
            name,
            version_byte,
            coin_type,
            address_scheme: AddressScheme::Keccak,
        }
    }

    /// Replace the address version byte.
    #[must_use]
    pub const fn with_version_byte(mut self, version_byte: u8) -> Self {
        self.version_byte = version_byte;
        self
    }

    /// Replace the BIP-44 coin type, and with it the default path.
    #[must_use]
    pub const fn with_coin_type(mut self, coin_type: u32) -> Self {
        self.coin_type = coin_type;
        self
    }

    /// Replace the address scheme.
    #[must_use]
    pub const fn with_address_scheme(mut self, address_scheme: AddressScheme) -> Self {
        self.address_scheme = address_scheme;
        self
    }

    /// Network name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Address version byte.
    #[inline]
    #[must_use]
    pub const fn version_byte(&self) -> u8 {
        self.version_byte
    }

    /// BIP-44 coin type.
    #[inline]
    #[must_use]
    pub const fn coin_type(&self) -> u32 {
        self.coin_type
    }

    /// Path used when an account is created without one:
    /// `m/44'/coin_type'/0'/0/0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPathComponent`](crate::Error::InvalidPathComponent)
    /// if the coin type is `>= 2^31`.
    pub fn default_path(&self) -> Result<DerivationPath> {
        DerivationPath::bip44(self.coin_type, 0, 0, 0)
    }

    /// Address payload scheme.
    #[inline]
    #[must_use]
    pub const fn address_scheme(&self) -> AddressScheme {
        self.address_scheme
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::TRON
    }
}

impl fmt::Display for ChainParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
