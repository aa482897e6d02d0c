//! # tronbridge - TRON account derivation
//!
//! Turns entropy into a usable TRON account: a BIP-39 mnemonic, the BIP-32
//! key at a BIP-44 path, the secp256k1 key pair at that node and its
//! Base58Check address.
//!
//! ## Features
//!
//! - `rand` (default): OS-backed entropy for [`Mnemonic::new`] and
//!   [`create_account`]. Without it, pass your own RNG to
//!   [`Account::create_with`].
//!
//! ## Usage
//!
//! ```
//! use tronbridge::{Account, ChainParams};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let account = Account::recover(&ChainParams::TRON, phrase, None, None)?;
//! assert_eq!(account.address().as_str(), "TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH");
//! # Ok::<(), tronbridge::Error>(())
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::redundant_closure_for_method_calls,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::missing_fields_in_debug
)]
#![forbid(unsafe_code)]

pub mod account;
pub mod address;
pub mod base58;
pub mod chain;
pub mod curve;
pub mod error;
pub mod extended_key;
pub mod hash;
pub mod keypair;
pub mod mnemonic;
pub mod path;

#[cfg(feature = "rand")]
pub use account::create_account;
pub use account::Account;
pub use address::{
    address_from_private_key, address_from_private_key_with, public_key_to_address, Address,
    AddressScheme,
};
pub use chain::{ChainParams, TRON_VERSION_BYTE};
pub use curve::{Curve, CurveError, Secp256k1};
pub use error::{DecodeError, Error, Result};
pub use extended_key::ExtendedKey;
pub use keypair::KeyPair;
pub use mnemonic::{BitSize, Mnemonic};
pub use path::{ChildIndex, DerivationPath, DEFAULT_PATH};
