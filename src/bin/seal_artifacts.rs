//! Artifact sealing utility.
//!
//! Hashes the four per-bracket artifacts and writes `manifest.json` next to
//! them, so `FsArtifactStore` can detect tampered or swapped files at load.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin seal_artifacts -- <artifact_dir>
//! ```
//!
//! Every artifact is parsed and schema-checked before sealing; a directory
//! that would not load is never sealed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use insurance_risk::adapters::{store, FsArtifactStore};

/// Write an integrity manifest for a directory of fitted artifacts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the model and scaler JSON files
    dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let dir = if args.dir.is_file() {
        args.dir
            .parent()
            .context("Artifact path has no parent directory")?
            .to_path_buf()
    } else {
        args.dir
    };

    FsArtifactStore::new(&dir)
        .load_unverified()
        .with_context(|| format!("Refusing to seal {dir:?}"))?;

    let manifest = store::seal(&dir).with_context(|| format!("Failed to seal {dir:?}"))?;

    println!("Sealed manifest: {:?}", dir.join(store::MANIFEST_FILE));
    for (name, digest) in &manifest.files {
        println!("  {digest}  {name}");
    }

    Ok(())
}
