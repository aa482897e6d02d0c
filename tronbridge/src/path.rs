//! BIP-32 derivation paths.
//!
//! Parses paths like `m/44'/195'/0'/0/0` into a sequence of child indices.
//! Hardened components may be written with `'`, `h` or `H`.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Default TRON account path (BIP-44, coin type 195).
pub const DEFAULT_PATH: &str = "m/44'/195'/0'/0/0";

/// BIP-44 purpose level.
pub const BIP44_PURPOSE: u32 = 44;

/// A child index in a derivation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index: 0 to 2^31 - 1
    Normal(u32),
    /// Hardened index: displayed as n', stored as n
    Hardened(u32),
}

impl ChildIndex {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal child index, or `None` if `index >= 2^31`.
    pub const fn normal(index: u32) -> Option<Self> {
        if index >= Self::HARDENED_OFFSET {
            None
        } else {
            Some(Self::Normal(index))
        }
    }

    /// Create a hardened child index, or `None` if `index >= 2^31`.
    pub const fn hardened(index: u32) -> Option<Self> {
        if index >= Self::HARDENED_OFFSET {
            None
        } else {
            Some(Self::Hardened(index))
        }
    }

    /// Check if this is a hardened index.
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Get the index value without the hardened flag.
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// Raw index used in derivation, including the hardened offset.
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }

    /// Parse one path component: decimal digits plus an optional hardened marker.
    fn parse_component(component: &str) -> Option<Self> {
        let is_marker = |c: char| matches!(c, '\'' | 'h' | 'H');
        let (digits, hardened) = match component.strip_suffix(is_marker) {
            Some(digits) => (digits, true),
            None => (component, false),
        };

        // `u32::from_str` accepts a leading '+'.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let index: u32 = digits.parse().ok()?;
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.to_u32()
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_component(s).ok_or_else(|| Error::InvalidPathComponent {
            path: s.to_owned(),
            component: s.to_owned(),
        })
    }
}

/// A BIP-32 derivation path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// The empty path, addressing the master key itself.
    pub const fn master() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Create a derivation path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Parse a derivation path.
    ///
    /// Leading and trailing `/` are ignored and a leading `m` or `M` marks the
    /// root. A path with no components at all (`""`, `"/"`) is rejected, while
    /// `"m"` on its own is the master path.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChildKeyPath`] if the path is empty.
    /// - [`Error::InvalidPathComponent`] if a component is not a valid index.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidChildKeyPath(path.to_owned()));
        }

        let mut components = trimmed.split('/').peekable();
        if matches!(components.peek(), Some(&("m" | "M"))) {
            components.next();
        }

        let indices = components
            .map(|component| {
                ChildIndex::parse_component(component).ok_or_else(|| {
                    Error::InvalidPathComponent {
                        path: path.to_owned(),
                        component: component.to_owned(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { indices })
    }

    /// BIP-44 path: `m/44'/coin_type'/account'/change/address_index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPathComponent`] if any value is `>= 2^31`.
    pub fn bip44(coin_type: u32, account: u32, change: u32, address_index: u32) -> Result<Self> {
        let levels = [
            (BIP44_PURPOSE, true),
            (coin_type, true),
            (account, true),
            (change, false),
            (address_index, false),
        ];

        let indices = levels
            .iter()
            .map(|&(value, hardened)| {
                let index = if hardened {
                    ChildIndex::hardened(value)
                } else {
                    ChildIndex::normal(value)
                };
                index.ok_or_else(|| Error::InvalidPathComponent {
                    path: format!("m/44'/{coin_type}'/{account}'/{change}/{address_index}"),
                    component: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { indices })
    }

    /// The child indices in order.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Number of derivation steps.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the path addresses the master key.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a child index.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// Iterate over the child indices.
    pub fn iter(&self) -> core::slice::Iter<'_, ChildIndex> {
        self.indices.iter()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildIndex;
    type IntoIter = core::slice::Iter<'a, ChildIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}
