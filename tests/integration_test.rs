use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use scholar_citation_tracker::commands::add::{add_publication_from_source, AddOutcome};
use scholar_citation_tracker::commands::annotate::add_tags_notes_to_publication;
use scholar_citation_tracker::db::{load_db, save_db, CitationDb};
use scholar_citation_tracker::record::PublicationOptions;
use scholar_citation_tracker::source::{MemoryPaper, MemorySource, SourceHandle, SourceRecord};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_scholar-citation-tracker");

fn handle(key: &str) -> SourceHandle {
    SourceHandle {
        detail_key: key.to_string(),
        cited_by_handle: Some(format!("cites:{}", key)),
        bib_url: Some(format!("bib:{}", key)),
        title: None,
    }
}

fn paper(key: &str, title: &str, citing: &[&str]) -> MemoryPaper {
    let mut record = SourceRecord::default();
    record.handle = handle(key);
    record.bibliography.insert("title".to_string(), title.to_string());
    MemoryPaper {
        record,
        citing: citing.iter().map(|k| handle(k)).collect(),
    }
}

/// Citation graph known to the provider:
///   transformer <- bert, gpt
///   bert <- gpt
fn provider() -> MemorySource {
    MemorySource::new(vec![
        paper("transformer", "Attention Is All You Need", &["bert", "gpt"]),
        paper("bert", "BERT: Pre-training of Deep Bidirectional Transformers", &["gpt"]),
        paper("gpt", "Language Models are Few-Shot Learners", &[]),
    ])
}

async fn add(path: &Path, source: &MemorySource, query: &str, tags: &[&str]) -> AddOutcome {
    let options = PublicationOptions {
        read: false,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        notes: None,
    };
    add_publication_from_source(path, source, query, &options, 0, |_| Ok(true))
        .await
        .unwrap()
}

fn cites_to(db: &CitationDb, id: &str) -> Vec<String> {
    db.get(id).unwrap().cites_to.clone()
}

#[tokio::test]
async fn test_build_graph_from_provider() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("citation_db.jsonl");
    save_db(&CitationDb::new(), &path).unwrap();
    let source = provider();

    add(&path, &source, "Attention Is All You Need", &["transformer"]).await;
    add(&path, &source, "BERT", &["NLP"]).await;
    let outcome = add(&path, &source, "few-shot learners", &[]).await;

    match outcome {
        AddOutcome::Added { links, .. } => assert_eq!(links.len(), 2),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let db = load_db(&path).unwrap();
    assert_eq!(db.len(), 3);
    assert!(cites_to(&db, "cites:transformer").is_empty());
    assert_eq!(cites_to(&db, "cites:bert"), vec!["cites:transformer"]);
    assert_eq!(
        cites_to(&db, "cites:gpt").into_iter().collect::<BTreeSet<_>>(),
        BTreeSet::from(["cites:transformer".to_string(), "cites:bert".to_string()])
    );

    let mut out = Vec::new();
    db.view_citation_network_with_tag("transformer", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Papers tagged with transformer\n"));
    assert!(text.contains("Attention Is All You Need\n\thas tags: [\"transformer\"]"));
    assert_eq!(text.matches("\t--->Attention Is All You Need has tags").count(), 2);

    let untagged: Vec<&str> = db.untagged().iter().map(|p| p.title()).collect();
    assert_eq!(untagged, vec!["Language Models are Few-Shot Learners"]);
}

#[tokio::test]
async fn test_rederive_matches_incremental_after_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("citation_db.jsonl");
    save_db(&CitationDb::new(), &path).unwrap();
    let source = provider();

    add(&path, &source, "few-shot", &[]).await;
    add(&path, &source, "attention", &[]).await;
    add(&path, &source, "bert", &[]).await;

    let loaded = load_db(&path).unwrap();
    let mut relinked = loaded.clone();
    relinked.rederive_links();
    assert_eq!(relinked, loaded);
}

#[tokio::test]
async fn test_annotate_after_add() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("citation_db.jsonl");
    save_db(&CitationDb::new(), &path).unwrap();
    add(&path, &provider(), "attention", &[]).await;

    add_tags_notes_to_publication(
        &path,
        "attention is all you need",
        &["NLP".to_string()],
        Some("good paper"),
    )
    .unwrap();
    add_tags_notes_to_publication(&path, "Attention Is All You Need", &["MT".to_string()], None)
        .unwrap();

    let db = load_db(&path).unwrap();
    let p = db.get("cites:transformer").unwrap();
    assert_eq!(p.tags, vec!["NLP", "MT"]);
    assert_eq!(p.notes, vec!["good paper"]);
}

#[test]
fn test_binary_help() {
    for sub in ["add", "annotate", "tagged", "new-identity"] {
        let status = Command::new(BIN)
            .args([sub, "--help"])
            .status()
            .expect("Failed to run --help");
        assert!(status.success(), "{} --help should succeed", sub);
    }
}

#[test]
fn test_binary_init_annotate_show() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("citation_db.jsonl");
    let db = path.to_str().unwrap();

    let status = Command::new(BIN).args(["init", "--db", db]).status().unwrap();
    assert!(status.success());
    let status = Command::new(BIN).args(["init", "--db", db]).status().unwrap();
    assert!(!status.success(), "init must not overwrite without --force");

    let output = Command::new(BIN)
        .args(["annotate", "Missing Paper", "--tag", "ML", "--db", db])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Missing Paper NOT FOUND IN DB"));

    let output = Command::new(BIN)
        .args(["untagged", "--db", db, "--log-level", "ERROR"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Untagged Papers\n");
}
