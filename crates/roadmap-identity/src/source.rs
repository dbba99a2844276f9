//! Where the base64 secret comes from
//!
//! The embedded literal keeps the historical no-argument behavior. Env and
//! file sources let the secret live outside the binary.

use crate::error::KeyError;
use std::fmt;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Base64 secret compiled into the binary
pub const EMBEDDED_KEY_BASE64: &str =
    "N3HB8Hh2PrWqhWH2Qqgr1vbU9T3gb1zgdBD8ZOdlQnVS7zC/nkEqaT1kSuvo4i3ldHWSkQZdw5I4LU5jOsDC6Q==";

/// Environment variable read by [`KeySource::default_env`]
pub const DEFAULT_KEY_ENV: &str = "ROADMAP_IDENTITY_KEY";

/// Source of the base64-encoded secret
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeySource {
    /// The literal compiled into the binary
    #[default]
    Embedded,
    /// Base64 text held in an environment variable
    Env(String),
    /// Base64 text stored in a file
    File(PathBuf),
}

impl KeySource {
    /// Env source reading [`DEFAULT_KEY_ENV`]
    #[inline]
    #[must_use]
    pub fn default_env() -> Self {
        Self::Env(DEFAULT_KEY_ENV.to_string())
    }

    /// Read the secret text
    ///
    /// # Errors
    /// `KeyError::Source` if the variable is unset or the file unreadable.
    pub fn acquire(&self) -> Result<Zeroizing<String>, KeyError> {
        let text = match self {
            Self::Embedded => EMBEDDED_KEY_BASE64.to_string(),
            Self::Env(var) => {
                std::env::var(var).map_err(|e| KeyError::Source(format!("{var}: {e}")))?
            }
            Self::File(path) => std::fs::read_to_string(path)
                .map_err(|e| KeyError::Source(format!("{}: {e}", path.display())))?,
        };
        Ok(Zeroizing::new(text))
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded literal"),
            Self::Env(var) => write!(f, "environment variable {var}"),
            Self::File(path) => write!(f, "file {}", path.display()),
        }
    }
}
