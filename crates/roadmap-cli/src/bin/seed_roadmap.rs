use anyhow::Context;
use roadmap_cli::{run_seed, SEED_DONE_BANNER, SEED_START_BANNER};
use roadmap_seeder::{DryRunRunner, ProcessRunner};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    roadmap_cli::init_tracing();

    let matches = roadmap_cli::seed_command().get_matches();
    let settings = roadmap_cli::seed_settings(&matches)?;
    let roadmap = settings
        .config
        .roadmap()
        .context("failed to load roadmap dataset")?;
    info!(
        canister = %settings.config.canister,
        id_source = %settings.config.id_source,
        milestones = roadmap.milestone_count(),
        tasks = roadmap.task_count(),
        "seeding roadmap"
    );

    println!("{SEED_START_BANNER}");
    let report = if settings.dry_run {
        run_seed(&settings.config, DryRunRunner::new(), &roadmap)
    } else {
        run_seed(&settings.config, ProcessRunner, &roadmap)
    };
    println!("{SEED_DONE_BANNER}");

    if report.is_clean() {
        info!(%report, "seeding finished");
    } else {
        warn!(%report, "seeding finished with failed calls");
    }
    Ok(())
}
