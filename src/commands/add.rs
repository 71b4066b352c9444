use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::AddArgs;
use crate::common::{format_elapsed, setup_logging};
use crate::db::{load_db, save_db, Link};
use crate::error::TrackerError;
use crate::network::{request_new_identity, NetworkClient};
use crate::record::{Publication, PublicationOptions};
use crate::source::{OpenAlexSource, PublicationQuery, ScholarSource, SourceRecord};

/// What happened to an add request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added {
        identifier: String,
        title: String,
        links: Vec<Link>,
    },
    /// The provider ran out of candidates (or failed) before one was confirmed
    NoCandidate,
    /// The confirmed candidate had no usable identifier
    Skipped { title: String },
}

/// Search `source`, let `confirm` pick a candidate, then insert and persist.
///
/// The database file is only rewritten after the publication has been built
/// and accepted by [`crate::db::CitationDb::add_publication`].
pub async fn add_publication_from_source<S, F>(
    db_path: &Path,
    source: &S,
    query: &str,
    options: &PublicationOptions,
    pause_secs: u64,
    mut confirm: F,
) -> Result<AddOutcome>
where
    S: ScholarSource + ?Sized,
    F: FnMut(&SourceRecord) -> Result<bool>,
{
    let mut db = load_db(db_path)
        .with_context(|| format!("Failed to load database: {}", db_path.display()))?;

    let mut query = PublicationQuery::start(source, &query.to_lowercase()).with_pause(pause_secs);
    info!("Searching {} for '{}'", source.name(), query.query());

    let candidate = loop {
        match query.next_result().await {
            Some(candidate) => {
                if confirm(&candidate)? {
                    break candidate;
                }
            }
            None => {
                info!("No publication confirmed; database unchanged");
                return Ok(AddOutcome::NoCandidate);
            }
        }
    };

    let publication = match Publication::from_source(source, &candidate, options).await {
        Ok(publication) => publication,
        Err(TrackerError::IdentifierUnavailable { title }) => {
            warn!("Skipping '{}': provider gave no identifier for it", title);
            return Ok(AddOutcome::Skipped { title });
        }
        Err(e) => return Err(e).context("Failed to build publication record"),
    };

    let identifier = publication.identifier.clone();
    let title = publication.title().to_string();
    let links = db.add_publication(publication)?;
    save_db(&db, db_path)
        .with_context(|| format!("Failed to save database: {}", db_path.display()))?;

    Ok(AddOutcome::Added {
        identifier,
        title,
        links,
    })
}

/// Ask until the answer is exactly `yes` or `no`
pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    loop {
        write!(output, "Enter yes or no: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            bail!("Input closed before a yes/no answer");
        }
        match answer.trim() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            _ => continue,
        }
    }
}

pub fn run_add(args: AddArgs) -> Result<AddOutcome> {
    let start_time = Instant::now();

    setup_logging(&args.db.log_level)?;

    info!("Database: {}", args.db.db.display());
    info!("Query: {}", args.query);

    if !args.db.db.exists() {
        bail!(
            "Database does not exist: {} (create it with `init`)",
            args.db.db.display()
        );
    }

    let client = NetworkClient::new(args.network.proxy_config())
        .context("Failed to build HTTP client")?;
    let source = OpenAlexSource::new(client.clone(), &args.api_base, args.mailto.clone());
    let options = PublicationOptions {
        read: args.read,
        tags: args.tags.clone(),
        notes: args.note.clone(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async {
        if let Some(control) = args.network.tor_control() {
            request_new_identity(&client, &control, &args.network.ident_url)
                .await
                .context("Failed to refresh Tor identity")?;
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        add_publication_from_source(
            &args.db.db,
            &source,
            &args.query,
            &options,
            args.pause_secs,
            |_candidate| prompt_yes_no(&mut input, &mut output),
        )
        .await
    })?;

    match &outcome {
        AddOutcome::Added {
            identifier,
            title,
            links,
        } => {
            info!("Added '{}' ({})", title, identifier);
            info!("Citation links found: {}", links.len());
        }
        AddOutcome::NoCandidate => info!("Nothing added"),
        AddOutcome::Skipped { title } => info!("Nothing added; '{}' was skipped", title),
    }
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{save_db, CitationDb};
    use crate::source::{MemoryPaper, MemorySource, SourceHandle};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn paper(key: &str, title: &str, citing: &[&str]) -> MemoryPaper {
        let mut record = SourceRecord::default();
        record.handle.detail_key = key.to_string();
        record.handle.cited_by_handle = Some(format!("cites:{}", key));
        record.bibliography.insert("title".to_string(), title.to_string());
        MemoryPaper {
            record,
            citing: citing
                .iter()
                .map(|k| SourceHandle {
                    detail_key: k.to_string(),
                    cited_by_handle: Some(format!("cites:{}", k)),
                    bib_url: None,
                    title: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_prompt_repeats_until_valid() {
        let mut input = Cursor::new("maybe\nYES\nno\n");
        let mut output = Vec::new();
        assert!(!prompt_yes_no(&mut input, &mut output).unwrap());
        assert_eq!(String::from_utf8(output).unwrap().matches("Enter yes or no: ").count(), 3);

        let mut input = Cursor::new(" yes \n");
        assert!(prompt_yes_no(&mut input, &mut Vec::new()).unwrap());
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let mut input = Cursor::new("");
        assert!(prompt_yes_no(&mut input, &mut Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_add_confirms_second_candidate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.jsonl");
        save_db(&CitationDb::new(), &path).unwrap();

        let source = MemorySource::new(vec![
            paper("a", "Graph Neural Networks", &[]),
            paper("b", "Graph Attention Networks", &["a"]),
        ]);
        let mut seen = Vec::new();
        let outcome = add_publication_from_source(
            &path,
            &source,
            "GRAPH",
            &PublicationOptions::default(),
            0,
            |candidate| {
                seen.push(candidate.handle.detail_key.clone());
                Ok(candidate.handle.detail_key == "b")
            },
        )
        .await
        .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        match outcome {
            AddOutcome::Added { identifier, title, .. } => {
                assert_eq!(identifier, "cites:b");
                assert_eq!(title, "Graph Attention Networks");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let db = load_db(&path).unwrap();
        assert_eq!(db.len(), 1);
        assert!(db.get("cites:b").unwrap().cited_by.contains("cites:a"));
    }

    #[tokio::test]
    async fn test_add_without_confirmation_changes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.jsonl");
        save_db(&CitationDb::new(), &path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let source = MemorySource::new(vec![paper("a", "Graph Neural Networks", &[])]);
        let outcome = add_publication_from_source(
            &path,
            &source,
            "graph",
            &PublicationOptions::default(),
            0,
            |_| Ok(false),
        )
        .await
        .unwrap();

        assert_eq!(outcome, AddOutcome::NoCandidate);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_duplicate_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.jsonl");
        save_db(&CitationDb::new(), &path).unwrap();
        let source = MemorySource::new(vec![paper("a", "Graph Neural Networks", &[])]);
        let options = PublicationOptions {
            tags: vec!["ML".to_string()],
            ..PublicationOptions::default()
        };

        add_publication_from_source(&path, &source, "graph", &options, 0, |_| Ok(true))
            .await
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = add_publication_from_source(
            &path,
            &source,
            "graph",
            &PublicationOptions::default(),
            0,
            |_| Ok(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::DuplicateIdentifier(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_skips_record_without_identifier() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.jsonl");
        save_db(&CitationDb::new(), &path).unwrap();

        let mut nameless = paper("a", "Anonymous Work", &[]);
        nameless.record.handle.cited_by_handle = None;
        let source = MemorySource::new(vec![nameless]);

        let outcome = add_publication_from_source(
            &path,
            &source,
            "anonymous",
            &PublicationOptions::default(),
            0,
            |_| Ok(true),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            AddOutcome::Skipped {
                title: "Anonymous Work".to_string()
            }
        );
        assert!(load_db(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_with_throttled_provider() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.jsonl");
        save_db(&CitationDb::new(), &path).unwrap();
        let source = MemorySource::new(vec![paper("a", "Graph Neural Networks", &[])]).unavailable();

        let outcome = add_publication_from_source(
            &path,
            &source,
            "graph",
            &PublicationOptions::default(),
            0,
            |_| Ok(true),
        )
        .await
        .unwrap();
        assert_eq!(outcome, AddOutcome::NoCandidate);
    }
}
