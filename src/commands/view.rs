use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{DbArgs, ShowArgs, TaggedArgs};
use crate::common::setup_logging;
use crate::db::{load_db, CitationDb};

fn open(args: &DbArgs) -> Result<CitationDb> {
    setup_logging(&args.log_level)?;
    load_for_view(&args.db)
}

pub(crate) fn load_for_view(path: &Path) -> Result<CitationDb> {
    load_db(path).with_context(|| format!("Failed to load database: {}", path.display()))
}

pub fn run_list(args: DbArgs) -> Result<()> {
    let db = open(&args)?;
    let mut out = io::stdout().lock();
    db.view_all_citations(&mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_network(args: DbArgs) -> Result<()> {
    let db = open(&args)?;
    let mut out = io::stdout().lock();
    db.view_citation_network(&mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_tagged(args: TaggedArgs) -> Result<()> {
    let db = open(&args.db)?;
    let mut out = io::stdout().lock();
    db.view_citation_network_with_tag(&args.tag, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_untagged(args: DbArgs) -> Result<()> {
    let db = open(&args)?;
    let mut out = io::stdout().lock();
    db.view_untagged(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Returns whether the title was found
pub fn run_show(args: ShowArgs) -> Result<bool> {
    let db = open(&args.db)?;
    let mut out = io::stdout().lock();
    let found = db.view_single(&args.title, &mut out)?;
    out.flush()?;
    Ok(found)
}
