//! Roadmap Seeder - populates the roadmap canister through `dfx`
//!
//! Walks a fixed roadmap (quarters, milestones, tasks) and issues one
//! `dfx canister call` per record:
//! - `addMilestone` per milestone, then a pause
//! - milestone id discovery (listing scrape or create reply)
//! - `addTask` per task, tagged with that id, with a pause after each
//!
//! Individual call failures are printed and skipped.
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_seeder::{ProcessRunner, Roadmap, RoadmapSeeder, SeederConfig};
//!
//! let config = SeederConfig::new();
//! let mut seeder = RoadmapSeeder::new(config.target(), ProcessRunner)
//!     .with_pacing(config.pacing());
//! let report = seeder.populate(&Roadmap::builtin());
//! println!("{report}");
//! ```

pub mod candid;
pub mod command;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod pacing;
pub mod seeder;

pub use command::{
    CanisterCall, CanisterTarget, CommandOutput, CommandRunner, DryRunRunner, ProcessRunner,
    ADD_MILESTONE, ADD_TASK, GET_MILESTONES,
};
pub use config::SeederConfig;
pub use dataset::{Milestone, Quarter, Roadmap, Task, TaskStatus};
pub use discovery::{parse_listing_id, parse_reply_id, IdSource};
pub use error::{CommandError, ConfigError, DatasetError};
pub use pacing::{Pacer, Pacing, ThreadPacer};
pub use seeder::{RoadmapSeeder, SeedReport, SeededMilestone};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
