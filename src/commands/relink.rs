use anyhow::{Context, Result};
use log::info;

use crate::cli::DbArgs;
use crate::common::setup_logging;
use crate::db::save_db;

use super::view::load_for_view;

/// Rebuild every `cites_to` list from the stored snapshots and persist
pub fn run_relink(args: DbArgs) -> Result<usize> {
    setup_logging(&args.log_level)?;

    let mut db = load_for_view(&args.db)?;
    let links = db.rederive_links();
    save_db(&db, &args.db)
        .with_context(|| format!("Failed to save database: {}", args.db.display()))?;

    info!("Re-derived {} citation links across {} publications", links, db.len());
    Ok(links)
}
