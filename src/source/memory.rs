use async_trait::async_trait;

use super::{ScholarSource, SourceError, SourceHandle, SourceRecord};

/// A paper held by [`MemorySource`] together with the handles citing it
#[derive(Debug, Clone)]
pub struct MemoryPaper {
    pub record: SourceRecord,
    pub citing: Vec<SourceHandle>,
}

/// Fixed, in-process provider. Search is a case-insensitive substring match
/// on titles.
#[derive(Debug, Clone)]
pub struct MemorySource {
    papers: Vec<MemoryPaper>,
    page_size: usize,
    unavailable: bool,
}

impl MemorySource {
    pub fn new(papers: Vec<MemoryPaper>) -> Self {
        Self {
            papers,
            page_size: 10,
            unavailable: false,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every call fail as a throttled provider would
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self) -> Result<(), SourceError> {
        if self.unavailable {
            return Err(SourceError::Status {
                status: 429,
                url: "memory://".to_string(),
            });
        }
        Ok(())
    }

    fn find(&self, detail_key: &str) -> Result<&MemoryPaper, SourceError> {
        self.papers
            .iter()
            .find(|p| p.record.handle.detail_key == detail_key)
            .ok_or_else(|| SourceError::Parse(format!("unknown paper {}", detail_key)))
    }
}

#[async_trait]
impl ScholarSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<SourceHandle>, SourceError> {
        self.check_available()?;
        let query = query.to_lowercase();
        let skip = (page.saturating_sub(1) as usize) * self.page_size;

        Ok(self
            .papers
            .iter()
            .filter(|p| p.record.title().to_lowercase().contains(&query))
            .skip(skip)
            .take(self.page_size)
            .map(|p| p.record.handle.clone())
            .collect())
    }

    async fn fill(&self, handle: &SourceHandle) -> Result<SourceRecord, SourceError> {
        self.check_available()?;
        let paper = self.find(&handle.detail_key)?;
        let mut record = paper.record.clone();
        record.citation_count = paper.citing.len() as u64;
        Ok(record)
    }

    async fn citing_papers(&self, record: &SourceRecord) -> Result<Vec<SourceHandle>, SourceError> {
        self.check_available()?;
        Ok(self.find(&record.handle.detail_key)?.citing.clone())
    }
}
