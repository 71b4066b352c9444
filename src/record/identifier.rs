use serde::{Deserialize, Serialize};

use crate::source::SourceHandle;

/// Which provider handle an identifier was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    /// The handle listing this paper's citing papers (preferred)
    CitedBy,
    /// The bibliography URL
    BibUrl,
}

impl IdSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdSource::CitedBy => "cited_by",
            IdSource::BibUrl => "bib_url",
        }
    }
}

impl std::fmt::Display for IdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identifier together with the handle it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
    pub id: String,
    pub source: IdSource,
}

/// Pick the identifier for a paper: cited-by handle first, then the
/// bibliography URL. Blank handles count as missing.
pub fn resolve_identifier(handle: &SourceHandle) -> Option<ResolvedId> {
    let non_blank = |h: &Option<String>| {
        h.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(id) = non_blank(&handle.cited_by_handle) {
        return Some(ResolvedId {
            id,
            source: IdSource::CitedBy,
        });
    }
    non_blank(&handle.bib_url).map(|id| ResolvedId {
        id,
        source: IdSource::BibUrl,
    })
}
