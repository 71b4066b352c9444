use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

use super::CitationDb;
use crate::common::format_elapsed;
use crate::error::{TrackerError, TrackerResult};
use crate::record::Publication;

pub const DEFAULT_DB_PATH: &str = "citation_db.jsonl";
pub const DB_FORMAT: &str = "scholar-citation-db";
pub const DB_VERSION: u32 = 1;

/// First line of every database file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbHeader {
    pub format: String,
    pub version: u32,
}

impl DbHeader {
    pub fn current() -> Self {
        Self {
            format: DB_FORMAT.to_string(),
            version: DB_VERSION,
        }
    }
}

/// Write the database as JSON Lines: a header, then one publication per line.
/// The file is written beside the target and renamed over it.
pub fn save_db(db: &CitationDb, path: &Path) -> TrackerResult<()> {
    let start = Instant::now();
    let tmp_path = temp_sibling(path);

    let result = write_rows(db, &tmp_path).and_then(|_| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    info!(
        "Saved {} publications to {} in {}",
        db.len(),
        path.display(),
        format_elapsed(start.elapsed())
    );
    Ok(())
}

fn write_rows(db: &CitationDb, path: &Path) -> TrackerResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", serde_json::to_string(&DbHeader::current())?)?;
    for publication in db.publications() {
        writeln!(writer, "{}", serde_json::to_string(publication)?)?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let run_id = &Uuid::new_v4().to_string()[..8];
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_DB_PATH);
    path.with_file_name(format!(".{}.{}.tmp", name, run_id))
}

/// Load a database written by [`save_db`]. Links are taken from the file as
/// stored, not re-derived.
pub fn load_db(path: &Path) -> TrackerResult<CitationDb> {
    let start = Instant::now();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(TrackerError::UnsupportedFormat(format!(
                    "{} is empty",
                    path.display()
                )))
            }
        }
    };
    let header: DbHeader = serde_json::from_str(&header_line).map_err(|e| {
        TrackerError::UnsupportedFormat(format!("bad header in {}: {}", path.display(), e))
    })?;
    if header.format != DB_FORMAT {
        return Err(TrackerError::UnsupportedFormat(format!(
            "unknown format '{}'",
            header.format
        )));
    }
    if header.version > DB_VERSION {
        return Err(TrackerError::UnsupportedFormat(format!(
            "version {} is newer than supported version {}",
            header.version, DB_VERSION
        )));
    }

    let mut db = CitationDb::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let publication: Publication = serde_json::from_str(&line)?;
        db.insert_loaded(publication)?;
    }

    debug!(
        "Loaded {} publications from {} in {}",
        db.len(),
        path.display(),
        format_elapsed(start.elapsed())
    );
    Ok(db)
}

impl CitationDb {
    // Rows from disk already carry their links
    fn insert_loaded(&mut self, publication: Publication) -> TrackerResult<()> {
        if self.contains(&publication.identifier) {
            return Err(TrackerError::DuplicateIdentifier(publication.identifier));
        }
        self.positions
            .insert(publication.identifier.clone(), self.publications.len());
        self.publications.push(publication);
        Ok(())
    }
}
