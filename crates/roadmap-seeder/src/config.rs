//! Seeder configuration
//!
//! Defaults reproduce the historical run: `dfx canister call roadmap ...`
//! on the default network, listing-based id discovery, 1s/500ms pauses and
//! the builtin roadmap. Pauses left unset follow the id source: fixed delays
//! for `listing`, none for `create-reply`.

use crate::command::CanisterTarget;
use crate::dataset::Roadmap;
use crate::discovery::IdSource;
use crate::error::{ConfigError, DatasetError};
use crate::pacing::Pacing;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seeder configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeederConfig {
    /// `dfx` executable
    pub program: String,
    /// Canister name
    pub canister: String,
    /// `--network` value, omitted when unset
    pub network: Option<String>,
    /// Milestone id discovery strategy
    pub id_source: IdSource,
    /// Pause after each milestone creation; unset follows `id_source`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_settle_ms: Option<u64>,
    /// Pause after each task creation; unset follows `id_source`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_gap_ms: Option<u64>,
    /// Dataset file; the builtin roadmap when unset
    pub dataset: Option<PathBuf>,
}

impl SeederConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; missing keys keep their defaults
    ///
    /// # Errors
    /// `ConfigError::Io` or `ConfigError::Parse`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on invalid TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// With canister name
    #[inline]
    #[must_use]
    pub fn with_canister(mut self, canister: impl Into<String>) -> Self {
        self.canister = canister.into();
        self
    }

    /// With network
    #[inline]
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// With id source
    #[inline]
    #[must_use]
    pub fn with_id_source(mut self, id_source: IdSource) -> Self {
        self.id_source = id_source;
        self
    }

    /// With pacing, stored at millisecond precision
    #[inline]
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.milestone_settle_ms = Some(duration_ms(pacing.milestone_settle));
        self.task_gap_ms = Some(duration_ms(pacing.task_gap));
        self
    }

    /// With dataset file
    #[inline]
    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<PathBuf>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    /// Call target described by this config
    #[must_use]
    pub fn target(&self) -> CanisterTarget {
        CanisterTarget::new(self.canister.clone())
            .with_program(self.program.clone())
            .with_network(self.network.clone())
    }

    /// Pauses described by this config
    ///
    /// Explicit values win; unset ones come from [`Self::default_pacing`].
    #[must_use]
    pub fn pacing(&self) -> Pacing {
        let fallback = self.default_pacing();
        Pacing {
            milestone_settle: self
                .milestone_settle_ms
                .map_or(fallback.milestone_settle, Duration::from_millis),
            task_gap: self.task_gap_ms.map_or(fallback.task_gap, Duration::from_millis),
        }
    }

    /// Pacing implied by the id source alone
    #[must_use]
    pub fn default_pacing(&self) -> Pacing {
        match self.id_source {
            IdSource::Listing => Pacing::fixed_delay(),
            IdSource::CreateReply => Pacing::acknowledged(),
        }
    }

    /// The configured dataset, or the builtin roadmap
    ///
    /// # Errors
    /// Any [`DatasetError`] from loading the file.
    pub fn roadmap(&self) -> Result<Roadmap, DatasetError> {
        match &self.dataset {
            Some(path) => Roadmap::load(path),
            None => Ok(Roadmap::builtin()),
        }
    }
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            program: "dfx".to_string(),
            canister: "roadmap".to_string(),
            network: None,
            id_source: IdSource::Listing,
            milestone_settle_ms: None,
            task_gap_ms: None,
            dataset: None,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_historical_run() {
        let config = SeederConfig::default();
        assert_eq!(config.target(), CanisterTarget::default());
        assert_eq!(config.pacing(), Pacing::fixed_delay());
        assert_eq!(config.id_source, IdSource::Listing);
        assert_eq!(config.roadmap().unwrap(), Roadmap::builtin());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SeederConfig::from_toml_str(
            "canister = \"roadmap_backend\"\nnetwork = \"ic\"\nid_source = \"create-reply\"\n",
        )
        .unwrap();

        assert_eq!(config.canister, "roadmap_backend");
        assert_eq!(config.network.as_deref(), Some("ic"));
        assert_eq!(config.id_source, IdSource::CreateReply);
        assert_eq!(config.program, "dfx");
        assert_eq!(config.task_gap_ms, None);
        assert_eq!(config.pacing(), Pacing::acknowledged());
    }

    #[test]
    fn explicit_pauses_survive_id_source_change() {
        let config = SeederConfig::from_toml_str("milestone_settle_ms = 2500\ntask_gap_ms = 250\n")
            .unwrap()
            .with_id_source(IdSource::CreateReply);

        assert_eq!(config.pacing().milestone_settle, Duration::from_millis(2500));
        assert_eq!(config.pacing().task_gap, Duration::from_millis(250));
    }

    #[test]
    fn unset_pause_follows_id_source() {
        let listing = SeederConfig::from_toml_str("task_gap_ms = 100").unwrap();
        assert_eq!(listing.pacing().milestone_settle, Duration::from_secs(1));
        assert_eq!(listing.pacing().task_gap, Duration::from_millis(100));

        let reply = listing.with_id_source(IdSource::CreateReply);
        assert!(reply.pacing().milestone_settle.is_zero());
        assert_eq!(reply.pacing().task_gap, Duration::from_millis(100));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            SeederConfig::from_toml_str("canistr = \"roadmap\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "milestone_settle_ms = 2500\ntask_gap_ms = 0").unwrap();

        let config = SeederConfig::load(file.path()).unwrap();
        assert_eq!(config.pacing().milestone_settle, Duration::from_millis(2500));
        assert!(config.pacing().task_gap.is_zero());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SeederConfig::load(&dir.path().join("seed.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn builders_override_fields() {
        let config = SeederConfig::new()
            .with_canister("other")
            .with_network("local")
            .with_id_source(IdSource::CreateReply)
            .with_pacing(Pacing::acknowledged())
            .with_dataset("roadmap.yaml");

        assert_eq!(config.target().canister(), "other");
        assert_eq!(config.pacing(), Pacing::acknowledged());
        assert_eq!(config.dataset, Some(PathBuf::from("roadmap.yaml")));
    }
}
