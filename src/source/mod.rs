//! The external scholarly search provider.
//!
//! A provider is consumed through three calls: a paged keyword search that
//! yields lightweight [`SourceHandle`]s, a `fill` that returns the full
//! [`SourceRecord`] for one handle, and `citing_papers` that enumerates the
//! handles of every paper citing a record.

pub mod memory;
pub mod openalex;
pub mod query;

pub use memory::{MemoryPaper, MemorySource};
pub use openalex::OpenAlexSource;
pub use query::PublicationQuery;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Opaque provider handles for one paper. Neither handle is parsed; both are
/// only ever compared as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceHandle {
    /// Key the provider needs to fetch full detail
    pub detail_key: String,
    /// Handle that enumerates this paper's citing papers
    pub cited_by_handle: Option<String>,
    /// Bibliography URL
    pub bib_url: Option<String>,
    pub title: Option<String>,
}

/// Fully detailed candidate returned by [`ScholarSource::fill`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecord {
    pub handle: SourceHandle,
    pub bibliography: BTreeMap<String, String>,
    pub citation_count: u64,
}

impl SourceRecord {
    pub fn title(&self) -> &str {
        self.bibliography
            .get("title")
            .map(String::as_str)
            .or(self.handle.title.as_deref())
            .unwrap_or("")
    }
}

impl fmt::Display for SourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        for (key, value) in &self.bibliography {
            if key != "title" {
                writeln!(f, "  {}: {}", key, value)?;
            }
        }
        write!(f, "  cited by: {}", self.citation_count)
    }
}

#[async_trait]
pub trait ScholarSource: Send + Sync {
    fn name(&self) -> &str;

    /// One page of search results; an empty page means the results are exhausted
    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<SourceHandle>, SourceError>;

    /// Full bibliographic detail for a search hit
    async fn fill(&self, handle: &SourceHandle) -> Result<SourceRecord, SourceError>;

    /// Every paper the provider knows to cite `record`
    async fn citing_papers(&self, record: &SourceRecord) -> Result<Vec<SourceHandle>, SourceError>;
}
