//! Elliptic curve operations needed by HD derivation.
//!
//! [`Curve`] exposes the handful of scalar and point operations BIP-32 and
//! address encoding rely on, over fixed-size SEC1 byte arrays. [`Secp256k1`]
//! is the production backend built on `k256`.

use core::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, PublicKey, Scalar, SecretKey};
use zeroize::Zeroizing;

/// Failure of a curve operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Scalar is zero or not below the group order.
    InvalidScalar,
    /// Bytes do not encode a point on the curve, or the result is the identity.
    InvalidPoint,
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScalar => write!(f, "scalar out of range"),
            Self::InvalidPoint => write!(f, "invalid curve point"),
        }
    }
}

impl std::error::Error for CurveError {}

/// Scalar and point arithmetic over 32-byte secrets and SEC1 points.
pub trait Curve: Clone {
    /// Check that `secret` lies in `[1, n)`.
    fn validate_secret(&self, secret: &[u8; 32]) -> Result<(), CurveError>;

    /// Compute `(secret + tweak) mod n`.
    ///
    /// Fails if `tweak >= n` or the sum is zero.
    fn add_secret_tweak(&self, secret: &[u8; 32], tweak: &[u8; 32])
        -> Result<[u8; 32], CurveError>;

    /// 33-byte SEC1 encoding of `secret · G`.
    fn compressed_public_key(&self, secret: &[u8; 32]) -> Result<[u8; 33], CurveError>;

    /// 65-byte SEC1 encoding of `secret · G`.
    fn uncompressed_public_key(&self, secret: &[u8; 32]) -> Result<[u8; 65], CurveError>;

    /// Parse a 33- or 65-byte SEC1 point and return its uncompressed form.
    fn parse_public_key(&self, bytes: &[u8]) -> Result<[u8; 65], CurveError>;

    /// Compute `tweak · G + point` for a compressed point.
    fn add_public_tweak(&self, point: &[u8; 33], tweak: &[u8; 32])
        -> Result<[u8; 33], CurveError>;
}

/// The secp256k1 curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Secp256k1;

impl Secp256k1 {
    fn scalar(bytes: &[u8; 32]) -> Result<Scalar, CurveError> {
        Option::from(Scalar::from_repr(*FieldBytes::from_slice(bytes)))
            .ok_or(CurveError::InvalidScalar)
    }

    fn secret_key(secret: &[u8; 32]) -> Result<SecretKey, CurveError> {
        SecretKey::from_slice(secret).map_err(|_| CurveError::InvalidScalar)
    }
}

impl Curve for Secp256k1 {
    fn validate_secret(&self, secret: &[u8; 32]) -> Result<(), CurveError> {
        Self::secret_key(secret).map(|_| ())
    }

    fn add_secret_tweak(
        &self,
        secret: &[u8; 32],
        tweak: &[u8; 32],
    ) -> Result<[u8; 32], CurveError> {
        let secret = Zeroizing::new(Self::scalar(secret)?);
        let tweak = Zeroizing::new(Self::scalar(tweak)?);
        let sum = Zeroizing::new(*secret + *tweak);
        if *sum == Scalar::ZERO {
            return Err(CurveError::InvalidScalar);
        }
        Ok(sum.to_bytes().into())
    }

    fn compressed_public_key(&self, secret: &[u8; 32]) -> Result<[u8; 33], CurveError> {
        let point = Self::secret_key(secret)?.public_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    fn uncompressed_public_key(&self, secret: &[u8; 32]) -> Result<[u8; 65], CurveError> {
        let point = Self::secret_key(secret)?.public_key().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    fn parse_public_key(&self, bytes: &[u8]) -> Result<[u8; 65], CurveError> {
        let key = PublicKey::from_sec1_bytes(bytes).map_err(|_| CurveError::InvalidPoint)?;
        let mut out = [0u8; 65];
        out.copy_from_slice(key.to_encoded_point(false).as_bytes());
        Ok(out)
    }

    fn add_public_tweak(
        &self,
        point: &[u8; 33],
        tweak: &[u8; 32],
    ) -> Result<[u8; 33], CurveError> {
        let parent = PublicKey::from_sec1_bytes(point).map_err(|_| CurveError::InvalidPoint)?;
        let child = ProjectivePoint::GENERATOR * Self::scalar(tweak)? + parent.to_projective();
        let child =
            PublicKey::from_affine(AffinePoint::from(child)).map_err(|_| CurveError::InvalidPoint)?;

        let mut out = [0u8; 33];
        out.copy_from_slice(child.to_encoded_point(true).as_bytes());
        Ok(out)
    }
}

/// Convert a 65-byte uncompressed SEC1 point to its 33-byte compressed form.
///
/// Only the prefix and the parity of Y are inspected; the point is not
/// validated.
pub fn compress_point(uncompressed: &[u8; 65]) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = 0x02 | (uncompressed[64] & 1);
    out[1..].copy_from_slice(&uncompressed[1..33]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Private key 1 maps to the generator.
    const ONE: [u8; 32] =
        hex!("0000000000000000000000000000000000000000000000000000000000000001");
    const G_COMPRESSED: [u8; 33] =
        hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    const G_UNCOMPRESSED: [u8; 65] = hex!(
        "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    );
    const ORDER: [u8; 32] =
        hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
    const ORDER_MINUS_ONE: [u8; 32] =
        hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");

    #[test]
    fn validate_secret_bounds() {
        let curve = Secp256k1;
        assert!(curve.validate_secret(&ONE).is_ok());
        assert!(curve.validate_secret(&ORDER_MINUS_ONE).is_ok());
        assert_eq!(curve.validate_secret(&[0u8; 32]), Err(CurveError::InvalidScalar));
        assert_eq!(curve.validate_secret(&ORDER), Err(CurveError::InvalidScalar));
    }

    #[test]
    fn generator_encodings() {
        let curve = Secp256k1;
        assert_eq!(curve.compressed_public_key(&ONE).unwrap(), G_COMPRESSED);
        assert_eq!(curve.uncompressed_public_key(&ONE).unwrap(), G_UNCOMPRESSED);
        assert_eq!(compress_point(&G_UNCOMPRESSED), G_COMPRESSED);
    }

    #[test]
    fn parse_normalizes_to_uncompressed() {
        let curve = Secp256k1;
        assert_eq!(curve.parse_public_key(&G_COMPRESSED).unwrap(), G_UNCOMPRESSED);
        assert_eq!(curve.parse_public_key(&G_UNCOMPRESSED).unwrap(), G_UNCOMPRESSED);
    }

    #[test]
    fn parse_rejects_off_curve() {
        let mut bad = G_UNCOMPRESSED;
        bad[64] ^= 1;
        assert_eq!(Secp256k1.parse_public_key(&bad), Err(CurveError::InvalidPoint));
        assert_eq!(Secp256k1.parse_public_key(&[0x04; 10]), Err(CurveError::InvalidPoint));
    }

    #[test]
    fn secret_tweak_wraps_modulo_order() {
        // (n - 1) + 1 == 0 is rejected, (n - 1) + 2 == 1.
        let mut two = [0u8; 32];
        two[31] = 2;
        assert_eq!(
            Secp256k1.add_secret_tweak(&ORDER_MINUS_ONE, &ONE),
            Err(CurveError::InvalidScalar)
        );
        assert_eq!(Secp256k1.add_secret_tweak(&ORDER_MINUS_ONE, &two).unwrap(), ONE);
    }

    #[test]
    fn secret_tweak_rejects_tweak_above_order() {
        assert_eq!(
            Secp256k1.add_secret_tweak(&ONE, &ORDER),
            Err(CurveError::InvalidScalar)
        );
    }

    #[test]
    fn public_tweak_matches_secret_tweak() {
        let curve = Secp256k1;
        let tweak = hex!("1111111111111111111111111111111111111111111111111111111111111111");
        let child_secret = curve.add_secret_tweak(&ONE, &tweak).unwrap();
        let expected = curve.compressed_public_key(&child_secret).unwrap();
        assert_eq!(curve.add_public_tweak(&G_COMPRESSED, &tweak).unwrap(), expected);
    }
}
