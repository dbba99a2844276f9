use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    roadmap_cli::init_tracing();

    let matches = roadmap_cli::key_command().get_matches();
    let materializer = roadmap_cli::key_materializer(&matches);
    info!(source = %materializer.source(), "materializing identity key");

    let key = materializer
        .materialize()
        .context("failed to materialize identity key")?;

    println!("✅  PEM saved as {}", key.path.display());
    info!(public_key = %key.public_key_hex, "ed25519 public key");
    Ok(())
}
