//! BIP-39 mnemonic phrases.
//!
//! Entropy is encoded as a sequence of words from the English BIP-39 wordlist.
//! Each word carries 11 bits; the final word also carries a checksum made of
//! the first `bits / 32` bits of SHA-256 over the entropy. The phrase is then
//! stretched into a 64-byte seed with PBKDF2-HMAC-SHA512.
//!
//! # Example
//!
//! ```
//! use tronbridge::mnemonic::{self, Mnemonic};
//!
//! let phrase = mnemonic::entropy_to_phrase(&[0u8; 16])?;
//! assert!(mnemonic::validate_phrase(&phrase));
//!
//! let mnemonic = Mnemonic::from_phrase(&phrase, None)?;
//! assert_eq!(mnemonic.word_count(), 12);
//! # Ok::<(), tronbridge::Error>(())
//! ```

use core::fmt;

use bip39::Language;
use pbkdf2::pbkdf2_hmac;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha512};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Locale tag of the only supported wordlist.
pub const LOCALE_ENGLISH: &str = "en";

/// Number of PBKDF2 rounds for seed derivation.
const PBKDF2_ROUNDS: u32 = 2048;

/// Bits encoded by a single word.
const BITS_PER_WORD: usize = 11;

/// BIP-39 English words are unique at 4 characters.
const MIN_PREFIX_LEN: usize = 4;

/// Supported entropy sizes.
///
/// The full BIP-39 range is accepted: 128 to 256 bits in steps of 32,
/// giving 12 to 24 words in steps of 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BitSize {
    /// 128 bits, 12 words.
    Bits128,
    /// 160 bits, 15 words.
    Bits160,
    /// 192 bits, 18 words.
    Bits192,
    /// 224 bits, 21 words.
    Bits224,
    /// 256 bits, 24 words.
    Bits256,
}

impl BitSize {
    /// All supported sizes, smallest first.
    pub const ALL: [Self; 5] = [
        Self::Bits128,
        Self::Bits160,
        Self::Bits192,
        Self::Bits224,
        Self::Bits256,
    ];

    /// Entropy size in bits.
    pub const fn bits(self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    /// Entropy size in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }

    /// Number of checksum bits appended to the entropy.
    pub const fn checksum_bits(self) -> usize {
        self.bits() / 32
    }

    /// Number of words in the phrase.
    pub const fn word_count(self) -> usize {
        self.bits() / 32 * 3
    }

    /// Look up the size that produces `count` words.
    pub fn from_word_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.word_count() == count)
    }

    fn from_entropy_len(len: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.bytes() == len)
            .ok_or(Error::InvalidBitSize(len * 8))
    }
}

impl TryFrom<usize> for BitSize {
    type Error = Error;

    fn try_from(bits: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.bits() == bits)
            .ok_or(Error::InvalidBitSize(bits))
    }
}

impl fmt::Display for BitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Generate `bit_size / 8` bytes of entropy from the operating system.
///
/// # Errors
///
/// Returns [`Error::InvalidBitSize`] for unsupported sizes and
/// [`Error::Entropy`] if the system RNG fails.
#[cfg(feature = "rand")]
pub fn generate_entropy(bit_size: usize) -> Result<Zeroizing<Vec<u8>>> {
    generate_entropy_with(&mut rand_core::OsRng, bit_size)
}

/// Generate entropy from a caller-supplied cryptographic RNG.
pub fn generate_entropy_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    bit_size: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let size = BitSize::try_from(bit_size)?;
    let mut entropy = Zeroizing::new(vec![0u8; size.bytes()]);
    rng.try_fill_bytes(entropy.as_mut_slice())?;
    Ok(entropy)
}

/// Encode entropy as a space-separated BIP-39 phrase.
///
/// # Errors
///
/// Returns [`Error::InvalidBitSize`] if the entropy is not 16, 20, 24, 28 or
/// 32 bytes long.
pub fn entropy_to_phrase(entropy: &[u8]) -> Result<Zeroizing<String>> {
    let size = BitSize::from_entropy_len(entropy.len())?;
    let hash = Sha256::digest(entropy);
    let word_list = Language::English.word_list();

    // Entropy bits followed by the checksum bits taken from the hash.
    let bit_at = |i: usize| -> usize {
        let (bytes, i) = if i < size.bits() {
            (entropy, i)
        } else {
            (hash.as_slice(), i - size.bits())
        };
        usize::from((bytes[i / 8] >> (7 - i % 8)) & 1)
    };

    let mut phrase = Zeroizing::new(String::with_capacity(size.word_count() * 9));
    for word in 0..size.word_count() {
        let start = word * BITS_PER_WORD;
        let index = (start..start + BITS_PER_WORD).fold(0, |acc, i| (acc << 1) | bit_at(i));
        if word > 0 {
            phrase.push(' ');
        }
        phrase.push_str(word_list[index]);
    }
    Ok(phrase)
}

/// Decode a phrase back into its entropy, verifying the embedded checksum.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonicPhrase`] for an unsupported word count, a
/// word outside the wordlist, or a checksum mismatch.
pub fn phrase_to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let normalized = Zeroizing::new(phrase.nfkd().collect::<String>());
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let size = BitSize::from_word_count(words.len()).ok_or(Error::InvalidMnemonicPhrase)?;
    let word_list = Language::English.word_list();

    let mut entropy = Zeroizing::new(vec![0u8; size.bytes()]);
    let mut checksum = 0u8;
    let mut cursor = 0;
    for word in &words {
        let index = word_list
            .binary_search(word)
            .map_err(|_| Error::InvalidMnemonicPhrase)?;

        for shift in (0..BITS_PER_WORD).rev() {
            let bit = (index >> shift) & 1 == 1;
            if cursor < size.bits() {
                if bit {
                    entropy[cursor / 8] |= 1 << (7 - cursor % 8);
                }
            } else {
                checksum = (checksum << 1) | u8::from(bit);
            }
            cursor += 1;
        }
    }

    let expected = Sha256::digest(entropy.as_slice())[0] >> (8 - size.checksum_bits());
    if checksum != expected {
        return Err(Error::InvalidMnemonicPhrase);
    }
    Ok(entropy)
}

/// Check a phrase against the wordlist and its checksum.
pub fn validate_phrase(phrase: &str) -> bool {
    phrase_to_entropy(phrase).is_ok()
}

/// Stretch a phrase and passphrase into a 64-byte seed.
///
/// Words are joined with single spaces first, so the seed matches
/// [`Mnemonic::from_phrase`] for any whitespace between words.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonicPhrase`] if the phrase does not validate.
pub fn phrase_to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>> {
    let canonical = canonicalize(phrase);
    phrase_to_entropy(&canonical)?;
    Ok(stretch(&canonical, passphrase))
}

fn canonicalize(phrase: &str) -> Zeroizing<String> {
    Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// PBKDF2-HMAC-SHA512 over the NFKD forms of phrase and `"mnemonic" ‖ passphrase`.
fn stretch(phrase: &str, passphrase: &str) -> Zeroizing<[u8; 64]> {
    let password = Zeroizing::new(phrase.nfkd().collect::<String>());
    let salt = Zeroizing::new(format!("mnemonic{passphrase}").nfkd().collect::<String>());

    let mut seed = Zeroizing::new([0u8; 64]);
    pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut seed[..],
    );
    seed
}

/// Expand abbreviated words in a phrase to their full BIP-39 form.
///
/// Each token is kept if it is an exact word, or expanded if it is a prefix of
/// at least 4 characters that matches exactly one word.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonicPhrase`] if a token is unknown, ambiguous
/// or too short to expand.
pub fn expand_phrase(phrase: &str) -> Result<Zeroizing<String>> {
    let word_list = Language::English.word_list();
    let expanded = phrase
        .split_whitespace()
        .map(|token| resolve_token(word_list, token))
        .collect::<Result<Vec<_>>>()?;
    Ok(Zeroizing::new(expanded.join(" ")))
}

fn resolve_token(word_list: &'static [&'static str; 2048], token: &str) -> Result<&'static str> {
    if let Ok(i) = word_list.binary_search(&token) {
        return Ok(word_list[i]);
    }
    if token.len() < MIN_PREFIX_LEN {
        return Err(Error::InvalidMnemonicPhrase);
    }

    let mut matches = word_list.iter().copied().filter(|w| w.starts_with(token));
    match (matches.next(), matches.next()) {
        (Some(word), None) => Ok(word),
        _ => Err(Error::InvalidMnemonicPhrase),
    }
}

/// A validated mnemonic phrase together with its derived seed.
///
/// Built once per account. The phrase and seed are zeroized on drop.
pub struct Mnemonic {
    bit_size: BitSize,
    phrase: Zeroizing<String>,
    locale: &'static str,
    seed: Zeroizing<[u8; 64]>,
    has_passphrase: bool,
}

impl Mnemonic {
    /// Generate a new mnemonic from OS entropy with an empty passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitSize`] unless `bit_size` is 128, 160, 192,
    /// 224 or 256.
    #[cfg(feature = "rand")]
    pub fn new(bit_size: usize) -> Result<Self> {
        Self::generate_with(&mut rand_core::OsRng, bit_size, None)
    }

    /// Generate a new mnemonic from the given RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        bit_size: usize,
        passphrase: Option<&str>,
    ) -> Result<Self> {
        let entropy = generate_entropy_with(rng, bit_size)?;
        Self::from_entropy(&entropy, passphrase)
    }

    /// Build a mnemonic from raw entropy.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        let phrase = entropy_to_phrase(entropy)?;
        Self::from_phrase(&phrase, passphrase)
    }

    /// Restore a mnemonic from an existing phrase.
    ///
    /// Whitespace between words is normalized to single spaces before the
    /// seed is derived.
    pub fn from_phrase(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let canonical = canonicalize(phrase);
        let entropy = phrase_to_entropy(&canonical)?;
        let bit_size = BitSize::from_entropy_len(entropy.len())?;
        let passphrase = passphrase.unwrap_or("");

        Ok(Self {
            bit_size,
            seed: stretch(&canonical, passphrase),
            phrase: canonical,
            locale: LOCALE_ENGLISH,
            has_passphrase: !passphrase.is_empty(),
        })
    }

    /// Entropy size of the phrase.
    pub const fn bit_size(&self) -> BitSize {
        self.bit_size
    }

    /// The phrase.
    ///
    /// **Security Warning**: the phrase reconstructs every derived key.
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Locale tag of the wordlist.
    pub const fn locale(&self) -> &'static str {
        self.locale
    }

    /// The 64-byte seed.
    #[inline]
    pub fn seed(&self) -> &[u8; 64] {
        &self.seed
    }

    /// Whether a non-empty passphrase was mixed into the seed.
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Number of words in the phrase.
    pub const fn word_count(&self) -> usize {
        self.bit_size.word_count()
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("bit_size", &self.bit_size)
            .field("locale", &self.locale)
            .field("phrase", &"[REDACTED]")
            .field("seed", &"[REDACTED]")
            .field("has_passphrase", &self.has_passphrase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// Fills every request with a fixed byte.
    struct FixedRng(u8);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for FixedRng {}

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
            let code = core::num::NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap();
            Err(rand_core::Error::from(code))
        }
    }

    impl CryptoRng for BrokenRng {}

    mod bit_size_tests {
        use super::*;

        #[test]
        fn supported_sizes() {
            for (bits, words) in [(128, 12), (160, 15), (192, 18), (224, 21), (256, 24)] {
                let size = BitSize::try_from(bits).unwrap();
                assert_eq!(size.word_count(), words);
                assert_eq!(BitSize::from_word_count(words), Some(size));
            }
        }

        #[test]
        fn unsupported_sizes() {
            for bits in [0, 100, 127, 129, 288, 512] {
                assert!(matches!(
                    BitSize::try_from(bits),
                    Err(Error::InvalidBitSize(n)) if n == bits
                ));
            }
        }
    }

    mod phrase_tests {
        use super::*;

        #[test]
        fn bip39_vectors() {
            let cases: &[(&[u8], &str)] = &[
                (&[0x00; 16], ABANDON_12),
                (
                    &[0x7f; 16],
                    "legal winner thank year wave sausage worth useful legal winner thank yellow",
                ),
                (
                    &[0x80; 16],
                    "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
                ),
                (&[0xff; 16], "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"),
                (
                    &[0x00; 32],
                    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art",
                ),
                (
                    &[0xff; 32],
                    "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo vote",
                ),
            ];

            for (entropy, expected) in cases {
                let phrase = entropy_to_phrase(entropy).unwrap();
                assert_eq!(phrase.as_str(), *expected);
                assert_eq!(phrase_to_entropy(&phrase).unwrap().as_slice(), *entropy);
            }
        }

        #[test]
        fn invalid_entropy_length() {
            assert!(matches!(
                entropy_to_phrase(&[0u8; 15]),
                Err(Error::InvalidBitSize(120))
            ));
        }

        #[test]
        fn wrong_checksum_word() {
            // "about" carries the checksum for all-zero entropy; "abandon" does not.
            let phrase = ABANDON_12.replace("about", "abandon");
            assert!(!validate_phrase(&phrase));
        }

        #[test]
        fn unknown_word() {
            let phrase = ABANDON_12.replace("about", "bitcoin");
            assert!(!validate_phrase(&phrase));
        }

        #[test]
        fn wrong_word_count() {
            assert!(!validate_phrase("abandon abandon about"));
            assert!(!validate_phrase(""));
        }

        #[test]
        fn extra_whitespace_is_accepted() {
            let phrase = format!("  {}  ", ABANDON_12.replace(' ', "   "));
            assert!(validate_phrase(&phrase));
        }
    }

    mod seed_tests {
        use super::*;

        #[test]
        fn seed_without_passphrase() {
            let seed = phrase_to_seed(ABANDON_12, "").unwrap();
            assert_eq!(
                hex::encode(seed.as_slice()),
                "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
            );
        }

        #[test]
        fn seed_with_passphrase() {
            let seed = phrase_to_seed(ABANDON_12, "TREZOR").unwrap();
            assert_eq!(
                hex::encode(seed.as_slice()),
                "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
            );
        }

        #[test]
        fn seed_ignores_extra_whitespace() {
            for spaced in [ABANDON_12.replace(' ', "  "), ABANDON_12.replace(' ', "\t")] {
                let seed = phrase_to_seed(&spaced, "").unwrap();
                let mnemonic = Mnemonic::from_phrase(&spaced, None).unwrap();
                assert_eq!(seed.as_slice(), mnemonic.seed());
                assert_eq!(seed[..4], hex_literal::hex!("5eb00bbd"));
            }
        }

        #[test]
        fn from_entropy_matches_from_phrase() {
            let from_entropy = Mnemonic::from_entropy(&[0u8; 16], Some("TREZOR")).unwrap();
            let from_phrase = Mnemonic::from_phrase(ABANDON_12, Some("TREZOR")).unwrap();
            assert_eq!(from_entropy.seed(), from_phrase.seed());
            assert!(from_entropy.has_passphrase());
        }

        #[test]
        fn invalid_phrase_has_no_seed() {
            let phrase = ABANDON_12.replace("about", "abandon");
            assert!(matches!(
                phrase_to_seed(&phrase, ""),
                Err(Error::InvalidMnemonicPhrase)
            ));
        }
    }

    mod mnemonic_tests {
        use super::*;

        #[test]
        fn generate_with_fixed_rng() {
            let mnemonic = Mnemonic::generate_with(&mut FixedRng(0), 128, None).unwrap();
            assert_eq!(mnemonic.phrase(), ABANDON_12);
            assert_eq!(mnemonic.bit_size(), BitSize::Bits128);
            assert_eq!(mnemonic.locale(), "en");
            assert!(!mnemonic.has_passphrase());
            assert_eq!(mnemonic.seed()[..4], hex_literal::hex!("5eb00bbd"));
        }

        #[test]
        fn generate_rejects_bad_size() {
            assert!(matches!(
                Mnemonic::generate_with(&mut FixedRng(0), 100, None),
                Err(Error::InvalidBitSize(100))
            ));
        }

        #[test]
        fn rng_failure_surfaces() {
            assert!(matches!(
                Mnemonic::generate_with(&mut BrokenRng, 256, None),
                Err(Error::Entropy(_))
            ));
        }

        #[test]
        fn from_phrase_normalizes_whitespace() {
            let spaced = ABANDON_12.replace(' ', "\t ");
            let mnemonic = Mnemonic::from_phrase(&spaced, None).unwrap();
            assert_eq!(mnemonic.phrase(), ABANDON_12);
        }

        #[test]
        fn passphrase_changes_seed() {
            let plain = Mnemonic::from_phrase(ABANDON_12, None).unwrap();
            let salted = Mnemonic::from_phrase(ABANDON_12, Some("TREZOR")).unwrap();
            assert!(salted.has_passphrase());
            assert_ne!(plain.seed(), salted.seed());
        }

        #[test]
        fn debug_redacts_secrets() {
            let mnemonic = Mnemonic::from_phrase(ABANDON_12, None).unwrap();
            let debug = format!("{mnemonic:?}");
            assert!(!debug.contains("abandon"));
            assert!(debug.contains("REDACTED"));
        }

        #[cfg(feature = "rand")]
        #[test]
        fn new_generates_valid_phrases() {
            for size in BitSize::ALL {
                let mnemonic = Mnemonic::new(size.bits()).unwrap();
                assert_eq!(mnemonic.word_count(), size.word_count());
                assert!(validate_phrase(mnemonic.phrase()));
            }
        }
    }

    mod expand_tests {
        use super::*;

        #[test]
        fn full_words_unchanged() {
            assert_eq!(expand_phrase(ABANDON_12).unwrap().as_str(), ABANDON_12);
        }

        #[test]
        fn four_letter_prefixes() {
            let abbreviated = "aban aban aban aban aban aban aban aban aban aban aban abou";
            assert_eq!(expand_phrase(abbreviated).unwrap().as_str(), ABANDON_12);
        }

        #[test]
        fn different_words_expand() {
            assert_eq!(
                expand_phrase("abil acti addr admi wall wris").unwrap().as_str(),
                "ability action address admit wall wrist"
            );
        }

        #[test]
        fn short_exact_words_accepted() {
            assert_eq!(expand_phrase("zoo art ice").unwrap().as_str(), "zoo art ice");
        }

        #[test]
        fn short_prefix_rejected() {
            assert!(matches!(
                expand_phrase("aba"),
                Err(Error::InvalidMnemonicPhrase)
            ));
        }

        #[test]
        fn unknown_prefix_rejected() {
            assert!(matches!(
                expand_phrase("aban zzzz"),
                Err(Error::InvalidMnemonicPhrase)
            ));
        }
    }
}
