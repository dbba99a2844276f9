//! Base64 decoding and seed normalization

use crate::error::KeyError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

/// Length of an Ed25519 private key seed
pub const SEED_LEN: usize = 32;

/// Length of a seed followed by its 32-byte companion value
pub const EXPANDED_LEN: usize = 64;

/// Decode base64 secret text, ignoring surrounding whitespace
///
/// # Errors
/// `KeyError::Decode` on malformed base64.
pub fn decode_secret(text: &str) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    let bytes = STANDARD.decode(text.trim())?;
    Ok(Zeroizing::new(bytes))
}

/// Reduce decoded key material to a 32-byte seed
///
/// 32 bytes pass through, 64 bytes keep the first half.
///
/// # Errors
/// `KeyError::InvalidKeyLength` for any other length.
pub fn normalize_seed(bytes: &[u8]) -> Result<Zeroizing<[u8; SEED_LEN]>, KeyError> {
    let seed = match bytes.len() {
        SEED_LEN => bytes,
        EXPANDED_LEN => &bytes[..SEED_LEN],
        actual => return Err(KeyError::InvalidKeyLength { actual }),
    };

    let mut out = Zeroizing::new([0u8; SEED_LEN]);
    out.copy_from_slice(seed);
    Ok(out)
}
