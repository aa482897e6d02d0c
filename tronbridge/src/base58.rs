//! Base58 and Base58Check encoding.
//!
//! Base58Check appends the first four bytes of a double SHA-256 over the
//! encoded bytes, so a single mistyped character is caught on decode.

use crate::error::{DecodeError, Error, Result};
use crate::hash::double_sha256;

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

/// Encode bytes to plain Base58 (no checksum).
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a plain Base58 string.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    bs58::decode(encoded).into_vec().map_err(|e| {
        let reason = match e {
            bs58::decode::Error::InvalidCharacter { character, index } => {
                DecodeError::InvalidCharacter { character, index }
            }
            _ => DecodeError::Malformed,
        };
        Error::Decode(reason)
    })
}

/// First four bytes of the double SHA-256 of `data`.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = double_sha256(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

/// Encode `version ‖ payload ‖ checksum` as Base58.
pub fn check_encode(payload: &[u8], version: u8) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    append_checksum_and_encode(data)
}

/// Encode `payload ‖ checksum` as Base58, without a version byte.
pub fn check_encode_raw(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    append_checksum_and_encode(data)
}

fn append_checksum_and_encode(mut data: Vec<u8>) -> String {
    let cs = checksum(&data);
    data.extend_from_slice(&cs);
    encode(&data)
}

/// Decode a string produced by [`check_encode`].
///
/// Returns the payload and the version byte.
pub fn check_decode(encoded: &str) -> Result<(Vec<u8>, u8)> {
    let data = decode(encoded)?;
    if data.len() < 1 + CHECKSUM_LEN {
        return Err(DecodeError::TooShort(data.len()).into());
    }

    let body = verify_checksum(&data)?;
    Ok((body[1..].to_vec(), body[0]))
}

/// Decode a string produced by [`check_encode_raw`].
pub fn check_decode_raw(encoded: &str) -> Result<Vec<u8>> {
    let data = decode(encoded)?;
    if data.len() < CHECKSUM_LEN {
        return Err(DecodeError::TooShort(data.len()).into());
    }

    verify_checksum(&data).map(<[u8]>::to_vec)
}

fn verify_checksum(data: &[u8]) -> Result<&[u8]> {
    let (body, cs) = data.split_at(data.len() - CHECKSUM_LEN);
    if cs != checksum(body) {
        return Err(Error::ChecksumMismatch);
    }
    Ok(body)
}
