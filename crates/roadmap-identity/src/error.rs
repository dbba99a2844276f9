//! Error types for identity key materialization

use std::path::PathBuf;

/// Errors raised while turning a base64 secret into a PEM credential file
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Secret text is not valid base64
    #[error("base64 decode failed: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Decoded key is neither 32 bytes nor reducible to 32 bytes
    #[error("invalid Ed25519 key length: expected 32 or 64 bytes, got {actual}")]
    InvalidKeyLength {
        /// Length of the decoded secret
        actual: usize,
    },

    /// PKCS#8 encoding or decoding failed
    #[error("PKCS#8 encoding failed: {0}")]
    Pkcs8(String),

    /// Encoded PEM does not decode back to the input seed
    #[error("encoded key does not round-trip to the input seed")]
    RoundTrip,

    /// Secret could not be read from its source
    #[error("key source unavailable: {0}")]
    Source(String),

    /// Output file could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl KeyError {
    /// Whether the error happened before anything touched the filesystem
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::InvalidKeyLength { .. } | Self::Source(_)
        )
    }
}
