//! Command-line plumbing shared by `materialize-key` and `seed-roadmap`
//!
//! Both tools run with no arguments; every flag only overrides a default.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use roadmap_identity::{KeyMaterializer, KeySource, DEFAULT_KEY_ENV, DEFAULT_OUTPUT};
use roadmap_seeder::{
    CommandRunner, IdSource, Roadmap, RoadmapSeeder, SeedReport, SeederConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Start banner printed before seeding
pub const SEED_START_BANNER: &str = "🚀 Starting to populate roadmap canister...";
/// Banner printed once seeding has walked the whole dataset
pub const SEED_DONE_BANNER: &str = "✅ Roadmap population complete!";

/// Install the stderr tracing subscriber; `RUST_LOG` overrides `warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed (tests, embedding binaries).
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// `materialize-key` argument definitions
#[must_use]
pub fn key_command() -> Command {
    Command::new("materialize-key")
        .version(roadmap_identity::VERSION)
        .about("Write the roadmap identity key as an unencrypted PKCS#8 PEM file")
        .arg(
            Arg::new("out")
                .long("out")
                .default_value(DEFAULT_OUTPUT)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output PEM path (overwritten if present)"),
        )
        .arg(
            Arg::new("key-file")
                .long("key-file")
                .value_parser(clap::value_parser!(PathBuf))
                .conflicts_with("key-env")
                .help("Read the base64 secret from a file"),
        )
        .arg(
            Arg::new("key-env")
                .long("key-env")
                .num_args(0..=1)
                .default_missing_value(DEFAULT_KEY_ENV)
                .help("Read the base64 secret from an environment variable"),
        )
}

/// Build the materializer described by parsed `materialize-key` flags
#[must_use]
pub fn key_materializer(matches: &ArgMatches) -> KeyMaterializer {
    let source = if let Some(path) = matches.get_one::<PathBuf>("key-file") {
        KeySource::File(path.clone())
    } else if let Some(var) = matches.get_one::<String>("key-env") {
        KeySource::Env(var.clone())
    } else {
        KeySource::Embedded
    };

    let output = matches
        .get_one::<PathBuf>("out")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    KeyMaterializer::new(source, output)
}

/// `seed-roadmap` argument definitions
#[must_use]
pub fn seed_command() -> Command {
    Command::new("seed-roadmap")
        .version(roadmap_seeder::VERSION)
        .about("Populate the roadmap canister with the roadmap dataset through dfx")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON or YAML roadmap instead of the builtin one"),
        )
        .arg(
            Arg::new("canister")
                .long("canister")
                .help("Canister name [default: roadmap]"),
        )
        .arg(
            Arg::new("network")
                .long("network")
                .help("dfx network, e.g. ic"),
        )
        .arg(
            Arg::new("id-source")
                .long("id-source")
                .value_parser([IdSource::Listing.as_str(), IdSource::CreateReply.as_str()])
                .help("How new milestone ids are learned; create-reply drops pauses the config leaves unset"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the dfx commands instead of running them"),
        )
}

/// Resolved `seed-roadmap` settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    /// Merged seeder configuration
    pub config: SeederConfig,
    /// Print calls instead of running them
    pub dry_run: bool,
}

/// Merge defaults, the optional config file and flags, in that order
///
/// # Errors
/// Unreadable or invalid config file, unknown id source.
pub fn seed_settings(matches: &ArgMatches) -> Result<SeedSettings> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SeederConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SeederConfig::new(),
    };

    if let Some(dataset) = matches.get_one::<PathBuf>("dataset") {
        config = config.with_dataset(dataset.clone());
    }
    if let Some(canister) = matches.get_one::<String>("canister") {
        config = config.with_canister(canister.clone());
    }
    if let Some(network) = matches.get_one::<String>("network") {
        config = config.with_network(network.clone());
    }
    if let Some(id_source) = matches.get_one::<String>("id-source") {
        config = config.with_id_source(id_source.parse::<IdSource>()?);
    }

    Ok(SeedSettings {
        config,
        dry_run: matches.get_flag("dry-run"),
    })
}

/// Seed `roadmap` through `runner` with the configured target and pacing
pub fn run_seed<R: CommandRunner>(config: &SeederConfig, runner: R, roadmap: &Roadmap) -> SeedReport {
    RoadmapSeeder::new(config.target(), runner)
        .with_pacing(config.pacing())
        .with_id_source(config.id_source)
        .populate(roadmap)
}
