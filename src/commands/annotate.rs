use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::cli::{AnnotateArgs, MarkReadArgs};
use crate::common::setup_logging;
use crate::db::{load_db, save_db};

/// Append tags and a note to every publication titled `title`, persisting
/// immediately. Returns the updated titles; empty means not found.
pub fn add_tags_notes_to_publication(
    db_path: &Path,
    title: &str,
    tags: &[String],
    notes: Option<&str>,
) -> Result<Vec<String>> {
    let mut db = load_db(db_path)
        .with_context(|| format!("Failed to load database: {}", db_path.display()))?;

    let updated = db.add_tags_notes_to_publication(title, tags, notes);
    report(title, &updated);
    if !updated.is_empty() {
        save_db(&db, db_path)
            .with_context(|| format!("Failed to save database: {}", db_path.display()))?;
    }
    Ok(updated)
}

/// Set or clear the read flag on every publication titled `title`
pub fn set_read(db_path: &Path, title: &str, read: bool) -> Result<Vec<String>> {
    let mut db = load_db(db_path)
        .with_context(|| format!("Failed to load database: {}", db_path.display()))?;

    let updated = db.set_read_by_title(title, read);
    report(title, &updated);
    if !updated.is_empty() {
        save_db(&db, db_path)
            .with_context(|| format!("Failed to save database: {}", db_path.display()))?;
    }
    Ok(updated)
}

fn report(title: &str, updated: &[String]) {
    if updated.is_empty() {
        println!();
        println!("{} NOT FOUND IN DB", title);
        println!();
    }
    for t in updated {
        println!("Updated {}", t);
    }
}

pub fn run_annotate(args: AnnotateArgs) -> Result<Vec<String>> {
    setup_logging(&args.db.log_level)?;
    info!("Annotating '{}' in {}", args.title, args.db.db.display());
    add_tags_notes_to_publication(&args.db.db, &args.title, &args.tags, args.note.as_deref())
}

pub fn run_mark_read(args: MarkReadArgs) -> Result<Vec<String>> {
    setup_logging(&args.db.log_level)?;
    set_read(&args.db.db, &args.title, !args.unread)
}
