//! Bootstrap command writing the socket identifier prefix file.
//!
//! Run once per boot (and per network namespace), before any service that
//! hands out socket identifiers starts. Exits non-zero when the hostname,
//! the uptime source or the destination is unusable.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The file to which the prefix should be written. If the file does not
    /// exist, it will be created. If the file's directory does not exist,
    /// creation will fail.
    #[arg(long, env = "FILENAME", default_value = sockid_prefix::DEFAULT_PREFIX_FILE)]
    filename: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let prefix = run(&args.filename)?;
    tracing::info!(path = %args.filename.display(), %prefix, "created prefix file");
    Ok(())
}

fn run(filename: &Path) -> anyhow::Result<String> {
    sockid_prefix::write_prefix_file(filename)
        .with_context(|| format!("could not create prefix file {}", filename.display()))
}
