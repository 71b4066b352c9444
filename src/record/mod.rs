pub mod identifier;
pub mod title;

pub use identifier::{resolve_identifier, IdSource, ResolvedId};
pub use title::{sanitize_title, titles_match};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{TrackerError, TrackerResult};
use crate::source::{ScholarSource, SourceRecord};

/// User-supplied state for a newly added publication
#[derive(Debug, Clone, Default)]
pub struct PublicationOptions {
    pub read: bool,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// One tracked paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub identifier: String,
    pub identifier_source: IdSource,
    pub bibliography: BTreeMap<String, String>,
    /// Identifiers of citing papers, as known when the record was created
    pub cited_by: BTreeSet<String>,
    /// Only ever filled in by the database's linkage scan
    #[serde(default)]
    pub cites_to: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub read: bool,
}

impl Publication {
    pub fn new(
        identifier: impl Into<String>,
        identifier_source: IdSource,
        mut bibliography: BTreeMap<String, String>,
        cited_by: impl IntoIterator<Item = String>,
    ) -> Self {
        if let Some(title) = bibliography.get_mut("title") {
            *title = sanitize_title(title);
        }
        Self {
            identifier: identifier.into(),
            identifier_source,
            bibliography,
            cited_by: cited_by.into_iter().collect(),
            cites_to: Vec::new(),
            tags: Vec::new(),
            notes: Vec::new(),
            read: false,
        }
    }

    /// Build a record from a provider candidate, fetching its citing papers
    pub async fn from_source<S: ScholarSource + ?Sized>(
        source: &S,
        record: &SourceRecord,
        options: &PublicationOptions,
    ) -> TrackerResult<Self> {
        let resolved = resolve_identifier(&record.handle).ok_or_else(|| {
            TrackerError::IdentifierUnavailable {
                title: record.title().to_string(),
            }
        })?;
        debug!("Identifier {} taken from {}", resolved.id, resolved.source);

        let citing = source.citing_papers(record).await?;
        let total = citing.len();
        let cited_by: Vec<String> = citing
            .iter()
            .filter_map(|handle| {
                let id = resolve_identifier(handle).map(|r| r.id);
                if id.is_none() {
                    debug!(
                        "Skipping citing paper without identifier: {}",
                        handle.title.as_deref().unwrap_or(&handle.detail_key)
                    );
                }
                id
            })
            .collect();
        info!(
            "Collected {} citing papers ({} without identifier) from {}",
            cited_by.len(),
            total - cited_by.len(),
            source.name()
        );

        let mut publication = Self::new(
            resolved.id,
            resolved.source,
            record.bibliography.clone(),
            cited_by,
        );
        if !publication.bibliography.contains_key("title") {
            if let Some(title) = &record.handle.title {
                publication
                    .bibliography
                    .insert("title".to_string(), sanitize_title(title));
            }
        }
        publication.read = options.read;
        publication.add_tags(&options.tags);
        if let Some(note) = &options.notes {
            publication.add_notes(note);
        }
        Ok(publication)
    }

    pub fn title(&self) -> &str {
        self.bibliography.get("title").map(String::as_str).unwrap_or("")
    }

    pub fn add_tags<T: AsRef<str>>(&mut self, tags: &[T]) {
        self.tags.extend(tags.iter().map(|t| t.as_ref().to_string()));
    }

    /// Append a note; blank notes are dropped
    pub fn add_notes(&mut self, note: &str) {
        if !note.trim().is_empty() {
            self.notes.push(note.to_string());
        }
    }

    pub fn set_read(&mut self, read: bool) {
        self.read = read;
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
