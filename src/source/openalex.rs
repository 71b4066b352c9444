use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{ScholarSource, SourceError, SourceHandle, SourceRecord};
use crate::common::create_spinner;
use crate::network::NetworkClient;

pub const DEFAULT_API_BASE: &str = "https://api.openalex.org";
const OPENALEX_ID_PREFIX: &str = "https://openalex.org/";
const SEARCH_PAGE_SIZE: u32 = 25;
const CITING_PAGE_SIZE: u32 = 200;
const CITING_FIELDS: &str = "id,doi,display_name,cited_by_api_url,primary_location";

/// OpenAlex works API. A work's `cited_by_api_url` serves as its cited-by
/// handle and its DOI (or landing page) as the bibliography URL.
pub struct OpenAlexSource {
    client: NetworkClient,
    api_base: String,
    mailto: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorksPage {
    #[serde(default)]
    results: Vec<Work>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Work {
    id: String,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    publication_year: Option<i32>,
    #[serde(default)]
    authorships: Option<Vec<Authorship>>,
    #[serde(default)]
    primary_location: Option<Location>,
    #[serde(default)]
    cited_by_count: Option<u64>,
    #[serde(default)]
    cited_by_api_url: Option<String>,
    #[serde(default, rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: AuthorRef,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    landing_page_url: Option<String>,
    #[serde(default)]
    source: Option<VenueRef>,
}

#[derive(Debug, Deserialize)]
struct VenueRef {
    #[serde(default)]
    display_name: Option<String>,
}

impl Work {
    fn short_id(&self) -> &str {
        self.id.strip_prefix(OPENALEX_ID_PREFIX).unwrap_or(&self.id)
    }

    fn landing_page(&self) -> Option<&str> {
        self.primary_location
            .as_ref()
            .and_then(|l| l.landing_page_url.as_deref())
    }

    fn handle(&self) -> SourceHandle {
        SourceHandle {
            detail_key: self.short_id().to_string(),
            cited_by_handle: self.cited_by_api_url.clone(),
            bib_url: self
                .doi
                .as_deref()
                .or(self.landing_page())
                .map(str::to_string),
            title: self.display_name.clone(),
        }
    }

    fn into_record(self) -> SourceRecord {
        let handle = self.handle();
        let mut bibliography = BTreeMap::new();

        if let Some(title) = &self.display_name {
            bibliography.insert("title".to_string(), title.clone());
        }
        let authors: Vec<&str> = self
            .authorships
            .iter()
            .flatten()
            .filter_map(|a| a.author.display_name.as_deref())
            .collect();
        if !authors.is_empty() {
            bibliography.insert("author".to_string(), authors.join(" and "));
        }
        if let Some(year) = self.publication_year {
            bibliography.insert("year".to_string(), year.to_string());
        }
        if let Some(venue) = self
            .primary_location
            .as_ref()
            .and_then(|l| l.source.as_ref())
            .and_then(|s| s.display_name.clone())
        {
            bibliography.insert("venue".to_string(), venue);
        }
        if let Some(doi) = &self.doi {
            bibliography.insert("doi".to_string(), doi.clone());
        }
        if let Some(url) = self.landing_page() {
            bibliography.insert("url".to_string(), url.to_string());
        }
        if let Some(kind) = &self.work_type {
            bibliography.insert("type".to_string(), kind.clone());
        }

        SourceRecord {
            handle,
            bibliography,
            citation_count: self.cited_by_count.unwrap_or(0),
        }
    }
}

impl OpenAlexSource {
    pub fn new(client: NetworkClient, api_base: &str, mailto: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            mailto,
        }
    }

    fn citing_url(&self, record: &SourceRecord) -> String {
        record.handle.cited_by_handle.clone().unwrap_or_else(|| {
            format!(
                "{}/works?filter=cites:{}",
                self.api_base, record.handle.detail_key
            )
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let mut request = self.client.http().get(url).query(params);
        if let Some(mailto) = &self.mailto {
            request = request.query(&[("mailto", mailto)]);
        }
        debug!("GET {} {:?}", url, params);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Parse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl ScholarSource for OpenAlexSource {
    fn name(&self) -> &str {
        "openalex"
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<SourceHandle>, SourceError> {
        let url = format!("{}/works", self.api_base);
        let params = [
            ("search", query.to_string()),
            ("page", page.to_string()),
            ("per-page", SEARCH_PAGE_SIZE.to_string()),
        ];
        let page: WorksPage = self.get_json(&url, &params).await?;
        Ok(page.results.iter().map(Work::handle).collect())
    }

    async fn fill(&self, handle: &SourceHandle) -> Result<SourceRecord, SourceError> {
        let url = format!("{}/works/{}", self.api_base, handle.detail_key);
        let work: Work = self.get_json(&url, &[]).await?;
        Ok(work.into_record())
    }

    async fn citing_papers(&self, record: &SourceRecord) -> Result<Vec<SourceHandle>, SourceError> {
        let url = self.citing_url(record);
        let spinner = create_spinner("Fetching citing papers");
        let mut handles = Vec::new();
        let mut cursor = "*".to_string();

        loop {
            let params = [
                ("per-page", CITING_PAGE_SIZE.to_string()),
                ("cursor", cursor.clone()),
                ("select", CITING_FIELDS.to_string()),
            ];
            let page: WorksPage = match self.get_json(&url, &params).await {
                Ok(page) => page,
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e);
                }
            };
            let exhausted = page.results.is_empty();
            handles.extend(page.results.iter().map(Work::handle));
            spinner.set_message(format!("Fetched {} citing papers", handles.len()));

            match page.meta.next_cursor {
                Some(next) if !exhausted => cursor = next,
                _ => break,
            }
        }

        spinner.finish_and_clear();
        Ok(handles)
    }
}
