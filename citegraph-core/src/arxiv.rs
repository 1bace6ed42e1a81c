//! arXiv export API client.
//!
//! Looks papers up by id via the Atom feed at `/api/query?id_list=`.
//! Entries are parsed by direct tag scanning. The feed carries no
//! structured reference list, so citation ids are harvested from the
//! entry's free-text fields (summary, comment, journal ref) instead.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::extract::IdExtractor;
use crate::fetch::PaperSource;
use crate::types::{PaperId, PaperRecord};

/// Client for the arXiv export API.
///
/// Enforces a minimum interval between requests across all callers
/// sharing the client, per the service's usage policy.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    last_request: std::sync::Mutex<Option<Instant>>,
    extractor: IdExtractor,
}

impl ArxivClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            min_interval: Duration::from_millis(config.min_request_interval_ms),
            last_request: std::sync::Mutex::new(None),
            extractor: IdExtractor::new(),
        })
    }

    /// Wait out the minimum request interval if the previous request
    /// was too recent. The lock is released while sleeping.
    async fn pace(&self) {
        let wait = {
            let last = self.last_request.lock().unwrap();
            match *last {
                Some(instant) => {
                    let elapsed = instant.elapsed();
                    if elapsed < self.min_interval {
                        Some(self.min_interval - elapsed)
                    } else {
                        None
                    }
                }
                None => None,
            }
        };
        if let Some(wait) = wait {
            tokio::time::sleep(wait).await;
        }
        *self.last_request.lock().unwrap() = Some(Instant::now());
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn lookup(&self, id: &PaperId) -> Result<PaperRecord, FetchError> {
        self.pace().await;

        let url = format!(
            "{}?id_list={}",
            self.base_url,
            urlencoding::encode(id.as_str())
        );
        tracing::debug!("arXiv fetch URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_feed(&body, id, &self.extractor)
    }
}

// ── Atom feed parsing ────────────────────────────────────────────────────────

fn parse_feed(
    feed: &str,
    id: &PaperId,
    extractor: &IdExtractor,
) -> Result<PaperRecord, FetchError> {
    let entry = extract_entries(feed)
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::NotFound { id: id.to_string() })?;

    // Unknown ids come back as a well-formed feed with an error entry.
    if let Some(entry_id) = extract_tag_text(entry, "id")
        && entry_id.contains("/api/errors")
    {
        return Err(FetchError::NotFound { id: id.to_string() });
    }

    let title = extract_tag_text(entry, "title")
        .map(|t| normalize_whitespace(&t))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FetchError::MissingTitle { id: id.to_string() })?;

    let mut scan_text = title.clone();
    for tag in ["summary", "arxiv:comment", "arxiv:journal_ref"] {
        if let Some(text) = extract_tag_text(entry, tag) {
            scan_text.push('\n');
            scan_text.push_str(&text);
        }
    }
    let cited_ids = extractor
        .scan(&scan_text)
        .into_iter()
        .filter(|cited| cited != id)
        .collect();

    Ok(PaperRecord::new(id.clone(), title, cited_ids))
}

/// Slice out the content of each `<entry>` block in document order.
fn extract_entries(feed: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut rest = feed;
    while let Some(start) = rest.find("<entry>") {
        let after = &rest[start + "<entry>".len()..];
        match after.find("</entry>") {
            Some(end) => {
                entries.push(&after[..end]);
                rest = &after[end + "</entry>".len()..];
            }
            None => break,
        }
    }
    entries
}

/// Text content of the first `<tag ...>...</tag>` occurrence, trimmed.
fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let start = xml.find(&open)?;
    let after_open = &xml[start..];
    let content_start = after_open.find('>')? + 1;
    let content = &after_open[content_start..];
    let end = content.find(&close)?;
    Some(content[..end].trim().to_string())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
