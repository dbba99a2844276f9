//! Milestone identifier discovery
//!
//! The canister assigns milestone ids; the dataset does not carry them.
//! `Listing` scrapes the first `id =` field out of a `getMilestones` dump
//! and assumes the newest record is printed first. `CreateReply` reads the
//! id from the `addMilestone` reply instead.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Marker preceding a record id in Candid text output
pub const ID_MARKER: &str = "id =";

/// How a freshly created milestone's identifier is learned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdSource {
    /// Scrape the first `id =` out of `getMilestones`
    #[default]
    Listing,
    /// Parse the id returned by `addMilestone`, falling back to `Listing`
    CreateReply,
}

impl IdSource {
    /// Name used in config files and flags
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::CreateReply => "create-reply",
        }
    }
}

impl fmt::Display for IdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listing" => Ok(Self::Listing),
            "create-reply" => Ok(Self::CreateReply),
            other => Err(ConfigError::UnknownIdSource(other.to_string())),
        }
    }
}

/// Id following the first `id =` in a listing, up to the next `:`
///
/// Returns 0 when the marker is absent or the token is not a number.
#[must_use]
pub fn parse_listing_id(output: &str) -> u64 {
    let Some(start) = output.find(ID_MARKER) else {
        return 0;
    };
    let rest = &output[start + ID_MARKER.len()..];
    let token = rest.split_once(':').map_or(rest, |(head, _)| head);

    parse_nat(token).unwrap_or_else(|| {
        warn!(token = token.trim(), "milestone id is not a number, using 0");
        0
    })
}

/// Milestone id in an `addMilestone` reply
///
/// A record reply gives the number after its `id =` field; otherwise the
/// first standalone natural number is used. `(7 : nat)` and
/// `(variant { ok = 7 : nat })` both give 7; `()` gives `None`.
#[must_use]
pub fn parse_reply_id(output: &str) -> Option<u64> {
    if let Some(start) = output.find(ID_MARKER) {
        let rest = output[start + ID_MARKER.len()..].trim_start();
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '_'))
            .unwrap_or(rest.len());
        if let Some(id) = parse_nat(&rest[..end]) {
            return Some(id);
        }
    }

    output
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(parse_nat)
}

/// Candid nat text, digit separators allowed
fn parse_nat(token: &str) -> Option<u64> {
    let digits: String = token.trim().chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
