//! Account creation and recovery.
//!
//! An [`Account`] runs the full pipeline: mnemonic, seed, master key, path
//! derivation, key pair and address. Either every step succeeds and a complete
//! account is returned, or the first failing step's error is returned as is.

use core::fmt;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::address::Address;
use crate::chain::ChainParams;
use crate::error::Result;
use crate::extended_key::ExtendedKey;
use crate::keypair::KeyPair;
use crate::mnemonic::{BitSize, Mnemonic};
use crate::path::DerivationPath;

/// Create a new TRON mainnet account from OS entropy.
///
/// `child_path` defaults to `m/44'/195'/0'/0/0` when `None`. An explicit
/// empty path is rejected.
///
/// # Errors
///
/// Any error from mnemonic generation, derivation or address encoding.
///
/// # Example
///
/// ```
/// let account = tronbridge::create_account(128, None)?;
/// assert!(account.address().as_str().starts_with('T'));
/// assert_eq!(account.path(), "m/44'/195'/0'/0/0");
/// # Ok::<(), tronbridge::Error>(())
/// ```
#[cfg(feature = "rand")]
pub fn create_account(bit_size: usize, child_path: Option<&str>) -> Result<Account> {
    Account::create(&ChainParams::TRON, bit_size, child_path)
}

/// A derived account.
pub struct Account {
    params: ChainParams,
    mnemonic: Mnemonic,
    extended_key: ExtendedKey,
    key_pair: KeyPair,
    address: Address,
}

impl Account {
    /// Create a new account from OS entropy.
    #[cfg(feature = "rand")]
    pub fn create(params: &ChainParams, bit_size: usize, child_path: Option<&str>) -> Result<Self> {
        let mnemonic = step("generate mnemonic", Mnemonic::new(bit_size))?;
        Self::from_mnemonic(params, mnemonic, child_path)
    }

    /// Create a new account from a caller-supplied RNG.
    pub fn create_with<R: RngCore + CryptoRng>(
        params: &ChainParams,
        rng: &mut R,
        bit_size: usize,
        child_path: Option<&str>,
    ) -> Result<Self> {
        let mnemonic = step(
            "generate mnemonic",
            Mnemonic::generate_with(rng, bit_size, None),
        )?;
        Self::from_mnemonic(params, mnemonic, child_path)
    }

    /// Recover an account from an existing phrase.
    pub fn recover(
        params: &ChainParams,
        phrase: &str,
        passphrase: Option<&str>,
        child_path: Option<&str>,
    ) -> Result<Self> {
        let mnemonic = step(
            "restore mnemonic",
            Mnemonic::from_phrase(phrase, passphrase),
        )?;
        Self::from_mnemonic(params, mnemonic, child_path)
    }

    /// Derive the account of an existing mnemonic.
    pub fn from_mnemonic(
        params: &ChainParams,
        mnemonic: Mnemonic,
        child_path: Option<&str>,
    ) -> Result<Self> {
        let master = step("master key", ExtendedKey::master_from_seed(mnemonic.seed()))?;
        let path = match child_path {
            Some(path) => step("parse path", DerivationPath::parse(path))?,
            None => step("default path", params.default_path())?,
        };
        let extended_key = step("derive path", master.derive(&path))?;
        let key_pair = step("extract key pair", extended_key.key_pair())?;
        let address = step(
            "encode address",
            key_pair.address(params.version_byte(), params.address_scheme()),
        )?;

        tracing::debug!(
            chain = %params,
            bits = mnemonic.bit_size().bits(),
            path = extended_key.path(),
            address = %address,
            "account derived"
        );

        Ok(Self {
            params: *params,
            mnemonic,
            extended_key,
            key_pair,
            address,
        })
    }

    /// Network parameters used for this account.
    pub const fn params(&self) -> &ChainParams {
        &self.params
    }

    /// The mnemonic.
    pub const fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    /// The mnemonic phrase.
    ///
    /// **Security Warning**: the phrase controls every key of the account.
    pub fn phrase(&self) -> &str {
        self.mnemonic.phrase()
    }

    /// The 64-byte BIP-39 seed.
    pub fn seed(&self) -> &[u8; 64] {
        self.mnemonic.seed()
    }

    /// Entropy size of the mnemonic.
    pub const fn bit_size(&self) -> BitSize {
        self.mnemonic.bit_size()
    }

    /// Wordlist locale of the mnemonic.
    pub const fn locale(&self) -> &'static str {
        self.mnemonic.locale()
    }

    /// The derived extended key.
    pub const fn extended_key(&self) -> &ExtendedKey {
        &self.extended_key
    }

    /// Derivation path of the account key.
    pub fn path(&self) -> &str {
        self.extended_key.path()
    }

    /// Depth of the account key.
    pub const fn depth(&self) -> u8 {
        self.extended_key.depth()
    }

    /// Whether the account key carries private material.
    pub const fn is_private(&self) -> bool {
        self.extended_key.is_private()
    }

    /// Parent fingerprint of the account key.
    pub const fn parent_fingerprint(&self) -> u32 {
        self.extended_key.parent_fingerprint_u32()
    }

    /// The key pair.
    pub const fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// 65-byte uncompressed public key.
    pub const fn public_key(&self) -> &[u8; 65] {
        self.key_pair.public_key()
    }

    /// Uncompressed public key as hex.
    pub fn public_key_hex(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Private key as hex.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        self.key_pair.private_key_hex()
    }

    /// The account address.
    pub const fn address(&self) -> &Address {
        &self.address
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("chain", &self.params.name())
            .field("bit_size", &self.mnemonic.bit_size())
            .field("path", &self.path())
            .field("address", &self.address.as_str())
            .field("mnemonic", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Log a failed pipeline step and pass the result through unchanged.
fn step<T>(name: &'static str, result: Result<T>) -> Result<T> {
    result.map_err(|err| {
        tracing::debug!(step = name, error = %err, "account derivation failed");
        err
    })
}
