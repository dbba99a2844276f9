//! Roadmap Identity - Ed25519 key materialization
//!
//! Turns a base64 Ed25519 secret (a 32-byte seed, or a 64-byte
//! seed-plus-public-key blob) into an unencrypted PKCS#8 PEM file that
//! `dfx identity import` accepts.
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_identity::{KeyMaterializer, KeySource};
//!
//! let key = KeyMaterializer::new(KeySource::default_env(), "identity.pem").materialize()?;
//! println!("public key {}", key.public_key_hex);
//! ```

pub mod error;
pub mod materializer;
pub mod pem;
pub mod seed;
pub mod source;

pub use error::KeyError;
pub use materializer::{pem_from_base64, KeyMaterializer, MaterializedKey, DEFAULT_OUTPUT};
pub use seed::{decode_secret, normalize_seed, EXPANDED_LEN, SEED_LEN};
pub use source::{KeySource, DEFAULT_KEY_ENV, EMBEDDED_KEY_BASE64};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
