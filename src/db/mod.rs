pub mod persistence;
pub mod views;

pub use persistence::*;

use log::info;
use std::collections::HashMap;

use crate::error::{TrackerError, TrackerResult};
use crate::record::{titles_match, Publication};

/// A citation edge found by the linkage scan: `citing` cites `cited`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub citing: String,
    pub cited: String,
}

/// All tracked publications, in insertion order, keyed by identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationDb {
    publications: Vec<Publication>,
    positions: HashMap<String, usize>,
}

impl CitationDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&Publication> {
        self.positions.get(identifier).map(|&i| &self.publications[i])
    }

    /// Publications in insertion order
    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.iter()
    }

    /// Title of a tracked publication, or the raw identifier if unknown
    pub fn title_of<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.get(identifier).map(Publication::title).unwrap_or(identifier)
    }

    /// Insert a publication and link it against everything already tracked.
    ///
    /// Every tracked publication `p`, the new one included, is checked both
    /// ways: `p` listed in the new record's `cited_by` means `p` cites the new
    /// record; the new identifier listed in `p.cited_by` means the new record
    /// cites `p`. Edges are never added retroactively between records already
    /// present.
    pub fn add_publication(&mut self, publication: Publication) -> TrackerResult<Vec<Link>> {
        if self.contains(&publication.identifier) {
            return Err(TrackerError::DuplicateIdentifier(publication.identifier));
        }
        info!("Currently adding ID: {}", publication.identifier);

        let new_pos = self.publications.len();
        self.positions.insert(publication.identifier.clone(), new_pos);
        self.publications.push(publication);

        let links = self.scan(new_pos, new_pos + 1);
        for link in &links {
            info!(
                "Found citation from {} to {}",
                self.title_of(&link.citing),
                self.title_of(&link.cited)
            );
        }
        Ok(links)
    }

    /// Clear every `cites_to` and replay the insertion-time scans in
    /// insertion order. Produces the same edges incremental insertion did.
    pub fn rederive_links(&mut self) -> usize {
        for publication in &mut self.publications {
            publication.cites_to.clear();
        }
        (0..self.publications.len())
            .map(|new_pos| self.scan(new_pos, new_pos + 1).len())
            .sum()
    }

    // Link the record at `new_pos` against the first `visible` records,
    // i.e. everything that existed once it was inserted.
    fn scan(&mut self, new_pos: usize, visible: usize) -> Vec<Link> {
        let new_id = self.publications[new_pos].identifier.clone();
        let mut links = Vec::new();

        for pos in 0..visible {
            let other_id = self.publications[pos].identifier.clone();

            if self.publications[new_pos].cited_by.contains(&other_id) {
                self.publications[pos].cites_to.push(new_id.clone());
                links.push(Link {
                    citing: other_id.clone(),
                    cited: new_id.clone(),
                });
            }
            if self.publications[pos].cited_by.contains(&new_id) {
                self.publications[new_pos].cites_to.push(other_id.clone());
                links.push(Link {
                    citing: new_id.clone(),
                    cited: other_id,
                });
            }
        }
        links
    }

    /// Append tags and a note to every publication whose title matches
    /// case-insensitively. Returns the titles that were updated.
    pub fn add_tags_notes_to_publication(
        &mut self,
        title: &str,
        tags: &[String],
        notes: Option<&str>,
    ) -> Vec<String> {
        let mut updated = Vec::new();
        for publication in &mut self.publications {
            if titles_match(publication.title(), title) {
                publication.add_tags(tags);
                if let Some(note) = notes {
                    publication.add_notes(note);
                }
                updated.push(publication.title().to_string());
            }
        }
        updated
    }

    /// Set the read flag on every publication whose title matches
    pub fn set_read_by_title(&mut self, title: &str, read: bool) -> Vec<String> {
        let mut updated = Vec::new();
        for publication in &mut self.publications {
            if titles_match(publication.title(), title) {
                publication.set_read(read);
                updated.push(publication.title().to_string());
            }
        }
        updated
    }

    pub fn find_by_title<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Publication> {
        self.publications
            .iter()
            .filter(move |p| titles_match(p.title(), title))
    }

    /// Publications with no tags at all
    pub fn untagged(&self) -> Vec<&Publication> {
        self.publications.iter().filter(|p| p.tags.is_empty()).collect()
    }
}
