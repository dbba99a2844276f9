//! Key materializer
//!
//! Runs the whole pipeline: acquire secret, decode, normalize, encode,
//! verify, write. Every intermediate secret buffer is zeroized on drop.

use crate::error::KeyError;
use crate::pem::{encode_pkcs8_pem, verify_round_trip, write_pem};
use crate::seed::{decode_secret, normalize_seed};
use crate::source::KeySource;
use ed25519_dalek::SigningKey;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Default output path, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "identity.pem";

/// Result of a successful materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedKey {
    /// Where the PEM was written
    pub path: PathBuf,
    /// Hex-encoded Ed25519 public key derived from the seed
    pub public_key_hex: String,
}

/// Turns a base64 secret into a PEM credential file
#[derive(Debug, Clone)]
pub struct KeyMaterializer {
    source: KeySource,
    output: PathBuf,
}

impl KeyMaterializer {
    /// Create a materializer for `source` writing to `output`
    #[inline]
    #[must_use]
    pub fn new(source: KeySource, output: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output: output.into(),
        }
    }

    /// With key source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: KeySource) -> Self {
        self.source = source;
        self
    }

    /// With output path
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Configured key source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &KeySource {
        &self.source
    }

    /// Configured output path
    #[inline]
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the pipeline and write the PEM file
    ///
    /// Nothing is written unless every step before the write succeeds.
    ///
    /// # Errors
    /// Any [`KeyError`]; `InvalidKeyLength` when the decoded secret is
    /// neither 32 nor 64 bytes.
    pub fn materialize(&self) -> Result<MaterializedKey, KeyError> {
        debug!(source = %self.source, "acquiring identity secret");
        let text = self.source.acquire()?;
        let (pem, public_key_hex) = pem_from_base64(&text)?;

        write_pem(&self.output, &pem)?;
        info!(path = %self.output.display(), public_key = %public_key_hex, "identity PEM written");

        Ok(MaterializedKey {
            path: self.output.clone(),
            public_key_hex,
        })
    }
}

impl Default for KeyMaterializer {
    fn default() -> Self {
        Self::new(KeySource::Embedded, DEFAULT_OUTPUT)
    }
}

/// Convert base64 secret text into PEM text plus the hex public key
///
/// # Errors
/// Decode, length, encoding or round-trip failures.
pub fn pem_from_base64(text: &str) -> Result<(Zeroizing<String>, String), KeyError> {
    let decoded = decode_secret(text)?;
    let seed = normalize_seed(&decoded)?;
    let signing_key = SigningKey::from_bytes(&seed);

    let pem = encode_pkcs8_pem(&signing_key)?;
    verify_round_trip(&pem, &seed)?;

    let public_key_hex = hex::encode(signing_key.verifying_key().to_bytes());
    Ok((pem, public_key_hex))
}
