//! BIP-32 hierarchical deterministic keys.
//!
//! An [`ExtendedKey`] pairs a private scalar (or a public point) with a
//! 32-byte chain code. Children are derived with HMAC-SHA512 keyed by the
//! chain code:
//!
//! - hardened: `HMAC(c, 0x00 ‖ k ‖ ser32(i))`, private parents only
//! - normal: `HMAC(c, serP(K) ‖ ser32(i))`, with `serP` the compressed point
//!
//! The left half of the output tweaks the parent key and the right half
//! becomes the child chain code.

use core::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::base58;
use crate::curve::{Curve, CurveError, Secp256k1};
use crate::error::{Error, Result};
use crate::hash::hash160;
use crate::keypair::KeyPair;
use crate::path::{ChildIndex, DerivationPath};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation.
const MASTER_KEY_SALT: &[u8] = b"Bitcoin seed";

/// Shortest seed accepted for master key generation.
pub const MIN_SEED_LEN: usize = 16;

/// Longest seed accepted for master key generation.
pub const MAX_SEED_LEN: usize = 64;

/// Mainnet `xprv` version bytes.
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Mainnet `xpub` version bytes.
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

#[derive(Clone)]
enum KeyMaterial {
    Private([u8; 32]),
    Public([u8; 33]),
}

impl Zeroize for KeyMaterial {
    fn zeroize(&mut self) {
        match self {
            Self::Private(secret) => secret.zeroize(),
            Self::Public(point) => point.zeroize(),
        }
    }
}

/// A node in a BIP-32 key tree.
///
/// The node remembers the path that produced it, e.g. `m/44'/195'/0'/0/0`.
/// Secret material is zeroized on drop.
#[derive(Clone)]
pub struct ExtendedKey<C: Curve = Secp256k1> {
    curve: C,
    material: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
    path: String,
}

impl<C: Curve> Zeroize for ExtendedKey<C> {
    fn zeroize(&mut self) {
        self.material.zeroize();
        self.chain_code.zeroize();
        self.depth = 0;
        self.parent_fingerprint.zeroize();
    }
}

impl<C: Curve> Drop for ExtendedKey<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ExtendedKey<Secp256k1> {
    /// Create the secp256k1 master key from a seed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSeedLength`] unless the seed is 16 to 64 bytes.
    /// - [`Error::KeyGeneration`] if the derived scalar is zero or `>= n`.
    pub fn master_from_seed(seed: &[u8]) -> Result<Self> {
        Self::master_from_seed_with(Secp256k1, seed)
    }
}

impl<C: Curve> ExtendedKey<C> {
    /// Create a master key on the given curve.
    pub fn master_from_seed_with(curve: C, seed: &[u8]) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let output = hmac_sha512(MASTER_KEY_SALT, &[seed]).map_err(|_| Error::KeyGeneration)?;
        let (secret, chain_code) = split_output(&output);
        curve
            .validate_secret(&secret)
            .map_err(|_| Error::KeyGeneration)?;

        Ok(Self {
            curve,
            material: KeyMaterial::Private(*secret),
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: ChildIndex::Normal(0),
            path: String::from("m"),
        })
    }

    /// Derive the child at `index`.
    ///
    /// # Errors
    ///
    /// - [`Error::DepthExceeded`] if this key is already at depth 255.
    /// - [`Error::HardenedFromPublic`] for a hardened index on a public key.
    /// - [`Error::Derivation`] if the child lands on an invalid key.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if self.depth == u8::MAX {
            return Err(Error::DepthExceeded);
        }

        let raw = index.to_u32();
        let failed = |_: CurveError| Error::Derivation {
            path: self.path.clone(),
            index: raw,
        };

        let parent_point = self.compressed_point().map_err(failed)?;
        let output = match (&self.material, index.is_hardened()) {
            (KeyMaterial::Private(secret), true) => {
                hmac_sha512(&self.chain_code, &[&[0x00], secret, &raw.to_be_bytes()])
            }
            (KeyMaterial::Public(_), true) => return Err(Error::HardenedFromPublic { index: raw }),
            (_, false) => hmac_sha512(&self.chain_code, &[&parent_point, &raw.to_be_bytes()]),
        }
        .map_err(|_| failed(CurveError::InvalidScalar))?;

        let (tweak, chain_code) = split_output(&output);
        let material = match &self.material {
            KeyMaterial::Private(secret) => {
                KeyMaterial::Private(self.curve.add_secret_tweak(secret, &tweak).map_err(failed)?)
            }
            KeyMaterial::Public(point) => {
                KeyMaterial::Public(self.curve.add_public_tweak(point, &tweak).map_err(failed)?)
            }
        };

        Ok(Self {
            curve: self.curve.clone(),
            material,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: fingerprint_of(&parent_point),
            child_index: index,
            path: format!("{}/{}", self.path, index),
        })
    }

    /// Parse `path` and derive along it.
    ///
    /// The path is parsed in full before any derivation, so a malformed
    /// component fails without doing any key arithmetic. A leading `m` is the
    /// root marker and does not consume a level; the components that follow
    /// are appended to this key's path.
    ///
    /// # Errors
    ///
    /// Path errors from [`DerivationPath::parse`], then any error of
    /// [`derive_child`](Self::derive_child).
    pub fn derive_path(&self, path: &str) -> Result<Self> {
        let path = DerivationPath::parse(path)?;
        self.derive(&path)
    }

    /// Derive along an already parsed path.
    pub fn derive(&self, path: &DerivationPath) -> Result<Self> {
        let mut current = self.clone();
        for &index in path {
            current = current.derive_child(index)?;
            tracing::trace!(path = current.path(), depth = current.depth(), "derived child key");
        }
        Ok(current)
    }

    /// Public-only copy of this key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the private key cannot produce
    /// a public point.
    pub fn neuter(&self) -> Result<Self> {
        let point = self
            .compressed_point()
            .map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self {
            curve: self.curve.clone(),
            material: KeyMaterial::Public(point),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            path: self.path.clone(),
        })
    }

    /// Whether this key carries private material.
    pub const fn is_private(&self) -> bool {
        matches!(self.material, KeyMaterial::Private(_))
    }

    /// Extract the key pair of this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyExtraction`] for a public-only key.
    pub fn key_pair(&self) -> Result<KeyPair> {
        match &self.material {
            KeyMaterial::Private(secret) => KeyPair::from_private_key_with(&self.curve, secret),
            KeyMaterial::Public(_) => Err(Error::KeyExtraction),
        }
    }

    /// The private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyExtraction`] for a public-only key.
    pub fn private_key(&self) -> Result<&[u8; 32]> {
        match &self.material {
            KeyMaterial::Private(secret) => Ok(secret),
            KeyMaterial::Public(_) => Err(Error::KeyExtraction),
        }
    }

    /// The 33-byte compressed public key.
    pub fn public_key(&self) -> Result<[u8; 33]> {
        self.compressed_point()
            .map_err(|_| Error::InvalidPrivateKey)
    }

    /// First four bytes of HASH160 of this key's compressed public key.
    pub fn fingerprint(&self) -> Result<[u8; 4]> {
        self.public_key().map(|point| fingerprint_of(&point))
    }

    /// Path from the master key, e.g. `m/44'/195'/0'/0/0`.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Depth in the tree; the master key is at depth 0.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Chain code.
    pub const fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Index that produced this key; `Normal(0)` for the master key.
    pub const fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Fingerprint of the parent key; zero for the master key.
    pub const fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// Parent fingerprint as a big-endian integer.
    pub const fn parent_fingerprint_u32(&self) -> u32 {
        u32::from_be_bytes(self.parent_fingerprint)
    }

    /// Serialize as a Base58Check `xprv` string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyExtraction`] for a public-only key.
    pub fn to_xprv(&self) -> Result<Zeroizing<String>> {
        let secret = self.private_key()?;
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(secret);
        Ok(Zeroizing::new(self.serialize(XPRV_VERSION, &key_data)))
    }

    /// Serialize as a Base58Check `xpub` string.
    pub fn to_xpub(&self) -> Result<String> {
        let point = self.public_key()?;
        Ok(self.serialize(XPUB_VERSION, &point))
    }

    /// version ‖ depth ‖ parent fingerprint ‖ child number ‖ chain code ‖ key
    fn serialize(&self, version: [u8; 4], key_data: &[u8; 33]) -> String {
        let mut data = Zeroizing::new(Vec::with_capacity(78));
        data.extend_from_slice(&version);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_index.to_u32().to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data.extend_from_slice(key_data);
        base58::check_encode_raw(&data)
    }

    fn compressed_point(&self) -> core::result::Result<[u8; 33], CurveError> {
        match &self.material {
            KeyMaterial::Private(secret) => self.curve.compressed_public_key(secret),
            KeyMaterial::Public(point) => Ok(*point),
        }
    }
}

impl<C: Curve> fmt::Debug for ExtendedKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("path", &self.path)
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("is_private", &self.is_private())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

fn hmac_sha512(
    key: &[u8],
    parts: &[&[u8]],
) -> core::result::Result<Zeroizing<[u8; 64]>, hmac::digest::InvalidLength> {
    let mut mac = HmacSha512::new_from_slice(key)?;
    for part in parts {
        mac.update(part);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());
    Ok(output)
}

/// Split `I` into the secret half `IL` and the chain code `IR`.
fn split_output(output: &[u8; 64]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    (left, right)
}

fn fingerprint_of(compressed_point: &[u8; 33]) -> [u8; 4] {
    let hash = hash160(compressed_point);
    [hash[0], hash[1], hash[2], hash[3]]
}
