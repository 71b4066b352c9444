use anyhow::{bail, Context, Result};
use log::info;

use crate::cli::InitArgs;
use crate::common::setup_logging;
use crate::db::{save_db, CitationDb};

pub fn run_init(args: InitArgs) -> Result<()> {
    setup_logging(&args.db.log_level)?;

    let path = &args.db.db;
    if path.exists() && !args.force {
        bail!(
            "Database already exists: {} (use --force to replace it)",
            path.display()
        );
    }

    save_db(&CitationDb::new(), path)
        .with_context(|| format!("Failed to create database: {}", path.display()))?;
    info!("Created empty citation database at {}", path.display());
    Ok(())
}
