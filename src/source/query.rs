use log::{debug, warn};
use std::collections::VecDeque;

use super::{ScholarSource, SourceHandle, SourceRecord};
use crate::common::{clock_time, slow_down};

/// Lazy cursor over a provider's search results, yielding one fully detailed
/// candidate at a time. Failures end the current attempt without raising.
pub struct PublicationQuery<'a, S: ScholarSource + ?Sized> {
    source: &'a S,
    query: String,
    next_page: u32,
    pending: VecDeque<SourceHandle>,
    exhausted: bool,
    pause_secs: u64,
}

impl<'a, S: ScholarSource + ?Sized> PublicationQuery<'a, S> {
    /// Set up the search; nothing is requested until the first `next_result`
    pub fn start(source: &'a S, query: &str) -> Self {
        Self {
            source,
            query: query.to_string(),
            next_page: 1,
            pending: VecDeque::new(),
            exhausted: false,
            pause_secs: 0,
        }
    }

    /// Pause this many seconds before every provider request
    pub fn with_pause(mut self, pause_secs: u64) -> Self {
        self.pause_secs = pause_secs;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Fetch the next candidate and print it. Any provider failure, including
    /// running out of results, yields `None`.
    pub async fn next_result(&mut self) -> Option<SourceRecord> {
        let handle = match self.next_handle().await {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                warn!("No more results for '{}'", self.query);
                return None;
            }
            Err(e) => {
                Self::report_failure(&e);
                return None;
            }
        };

        slow_down(self.pause_secs).await;
        match self.source.fill(&handle).await {
            Ok(record) => {
                println!("{}", record);
                Some(record)
            }
            Err(e) => {
                Self::report_failure(&e);
                None
            }
        }
    }

    async fn next_handle(&mut self) -> Result<Option<SourceHandle>, super::SourceError> {
        while self.pending.is_empty() && !self.exhausted {
            slow_down(self.pause_secs).await;
            debug!("Requesting page {} for '{}'", self.next_page, self.query);
            let page = self.source.search_page(&self.query, self.next_page).await?;
            self.next_page += 1;
            if page.is_empty() {
                self.exhausted = true;
            }
            self.pending.extend(page);
        }
        Ok(self.pending.pop_front())
    }

    fn report_failure(error: &super::SourceError) {
        warn!("Search provider failed: {}", error);
        warn!("Try again in an hour or so (now {} UTC)", clock_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemoryPaper, MemorySource};

    fn paper(key: &str, title: &str) -> MemoryPaper {
        let mut record = SourceRecord::default();
        record.handle.detail_key = key.to_string();
        record.handle.cited_by_handle = Some(format!("cites:{}", key));
        record.bibliography.insert("title".to_string(), title.to_string());
        MemoryPaper {
            record,
            citing: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_walks_pages_until_exhausted() {
        let source = MemorySource::new(vec![
            paper("a", "Neural Networks"),
            paper("b", "Neural Machine Translation"),
            paper("c", "Neural Tangent Kernel"),
        ])
        .with_page_size(2);
        let mut query = PublicationQuery::start(&source, "neural");

        let keys: Vec<String> = [
            query.next_result().await,
            query.next_result().await,
            query.next_result().await,
        ]
        .into_iter()
        .map(|r| r.unwrap().handle.detail_key)
        .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);

        assert!(query.next_result().await.is_none());
        assert!(query.next_result().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_soft() {
        let source = MemorySource::new(vec![paper("a", "Neural Networks")]).unavailable();
        let mut query = PublicationQuery::start(&source, "neural");
        assert!(query.next_result().await.is_none());
    }

    #[tokio::test]
    async fn test_no_matches() {
        let source = MemorySource::new(vec![paper("a", "Neural Networks")]);
        let mut query = PublicationQuery::start(&source, "bayesian");
        assert_eq!(query.query(), "bayesian");
        assert!(query.next_result().await.is_none());
    }
}
