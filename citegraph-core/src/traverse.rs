//! Citation graph traversal engine.
//!
//! Starting from a root paper, the engine expands citation edges
//! breadth-first through a work queue, fetching papers in small
//! concurrent groups with a pause between groups. A shared visited set
//! claims ids at enqueue time, so cycles and shared descendants cannot
//! cause a paper to be expanded twice in one run. Every successfully
//! expanded paper contributes its title once to the tally.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;

use crate::arxiv::ArxivClient;
use crate::cache::{JsonFileCache, NoopCache, PaperCache};
use crate::config::Config;
use crate::error::{CitegraphError, Result};
use crate::extract::IdExtractor;
use crate::fetch::{PaperFetcher, PaperSource};
use crate::tally::CitationTally;
use crate::types::PaperId;
use crate::visited::VisitedSet;

/// Smallest accepted traversal depth.
pub const MIN_DEPTH: u32 = 1;
/// Largest accepted traversal depth.
pub const MAX_DEPTH: u32 = 10;

/// Runs citation analyses against a paper source.
pub struct Analyzer {
    fetcher: PaperFetcher,
    extractor: IdExtractor,
    group_size: usize,
    group_delay: Duration,
}

impl Analyzer {
    /// Analyzer against the live arXiv export API, with the file cache
    /// from `config` (or no cache when disabled).
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(ArxivClient::new(&config.api)?);
        let cache: Arc<dyn PaperCache> = if config.cache.enabled {
            Arc::new(JsonFileCache::new(config.cache.resolve_dir()))
        } else {
            Arc::new(NoopCache)
        };
        Ok(Self::new(source, cache, config))
    }

    /// Analyzer over an explicit source and cache. This is the seam
    /// used by tests and by embedders with their own paper store.
    pub fn new(
        source: Arc<dyn PaperSource>,
        cache: Arc<dyn PaperCache>,
        config: &Config,
    ) -> Self {
        Self {
            fetcher: PaperFetcher::new(source, cache, &config.fetch),
            extractor: IdExtractor::new(),
            group_size: config.traversal.group_size.max(1),
            group_delay: Duration::from_millis(config.traversal.group_delay_ms),
        }
    }

    /// Analyze the citation graph reachable from `locator`, following
    /// citation edges at most `max_depth` hops from the root.
    ///
    /// The root paper counts as depth 0 and is always included. Returns
    /// the accumulated title tally, or an error when the locator cannot
    /// be parsed, the depth is out of range, or the root paper yields
    /// no results at all.
    pub async fn analyze(&self, locator: &str, max_depth: u32) -> Result<CitationTally> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&max_depth) {
            return Err(CitegraphError::DepthOutOfRange {
                depth: max_depth,
                max: MAX_DEPTH,
            });
        }
        let root =
            self.extractor
                .from_locator(locator)
                .ok_or_else(|| CitegraphError::UnparsableLocator {
                    locator: locator.to_string(),
                })?;

        tracing::info!("Analyzing citations of {} to depth {}", root, max_depth);
        let tally = self.traverse(root, max_depth).await;
        if tally.is_empty() {
            return Err(CitegraphError::NoCitations);
        }
        tracing::info!("Analysis complete: {} distinct titles", tally.len());
        Ok(tally)
    }

    /// Breadth-first expansion from `root`.
    ///
    /// Ids are claimed in the visited set when enqueued, never when
    /// fetched. An id that fails to fetch is dropped as a leaf; its
    /// claim stands so no sibling re-queues it later.
    async fn traverse(&self, root: PaperId, max_depth: u32) -> CitationTally {
        let visited = VisitedSet::new();
        let mut tally = CitationTally::new();
        let mut queue: VecDeque<(PaperId, u32)> = VecDeque::new();

        visited.claim(&root);
        queue.push_back((root, 0));

        let mut first_group = true;
        while !queue.is_empty() {
            if !first_group {
                sleep(self.group_delay).await;
            }
            first_group = false;

            let take = self.group_size.min(queue.len());
            let group: Vec<(PaperId, u32)> = queue.drain(..take).collect();
            tracing::debug!(
                "Expanding group of {} ({} queued behind it)",
                group.len(),
                queue.len()
            );

            let fetches = group.iter().map(|(id, _)| self.fetcher.fetch(id));
            let results = join_all(fetches).await;

            for ((id, depth), result) in group.into_iter().zip(results) {
                let Some(record) = result else {
                    tracing::debug!("Dropping {} from the graph, fetch failed", id);
                    continue;
                };
                tally.add(&record.title);
                if depth < max_depth {
                    for cited in &record.cited_ids {
                        if visited.claim(cited) {
                            queue.push_back((cited.clone(), depth + 1));
                        }
                    }
                }
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::fetch::StaticPaperSource;
    use crate::types::PaperRecord;

    fn id(s: &str) -> PaperId {
        PaperId::parse(s).unwrap()
    }

    fn paper(source: &StaticPaperSource, raw_id: &str, title: &str, cited: &[&str]) {
        let cited_ids = cited.iter().map(|c| id(c)).collect();
        source.insert(PaperRecord::new(id(raw_id), title, cited_ids));
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.fetch.retry_base_delay_ms = 1;
        config.traversal.group_delay_ms = 1;
        config
    }

    fn analyzer(source: Arc<StaticPaperSource>) -> Analyzer {
        Analyzer::new(source, Arc::new(MemoryCache::new()), &fast_config())
    }

    #[tokio::test]
    async fn test_analyze_single_paper_without_citations() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "1706.03762", "Attention Is All You Need", &[]);
        let tally = analyzer(source)
            .analyze("1706.03762", 3)
            .await
            .unwrap();
        assert_eq!(tally.count("Attention Is All You Need"), 1);
        assert_eq!(tally.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_counts_duplicate_titles() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Root Paper", &["2102.00002", "2103.00003"]);
        paper(&source, "2102.00002", "Shared Title", &[]);
        paper(&source, "2103.00003", "Shared Title", &[]);
        let tally = analyzer(source).analyze("2101.00001", 1).await.unwrap();
        assert_eq!(tally.count("Root Paper"), 1);
        assert_eq!(tally.count("Shared Title"), 2);
    }

    #[tokio::test]
    async fn test_analyze_two_node_cycle() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Paper A", &["2102.00002"]);
        paper(&source, "2102.00002", "Paper B", &["2101.00001"]);
        let tally = analyzer(source.clone()).analyze("2101.00001", 5).await.unwrap();
        assert_eq!(tally.count("Paper A"), 1);
        assert_eq!(tally.count("Paper B"), 1);
        assert_eq!(source.lookup_count(&id("2101.00001")), 1);
        assert_eq!(source.lookup_count(&id("2102.00002")), 1);
    }

    #[tokio::test]
    async fn test_analyze_three_node_cycle() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Paper A", &["2102.00002"]);
        paper(&source, "2102.00002", "Paper B", &["2103.00003"]);
        paper(&source, "2103.00003", "Paper C", &["2101.00001"]);
        let tally = analyzer(source.clone()).analyze("2101.00001", 10).await.unwrap();
        for title in ["Paper A", "Paper B", "Paper C"] {
            assert_eq!(tally.count(title), 1);
        }
        for raw in ["2101.00001", "2102.00002", "2103.00003"] {
            assert_eq!(source.lookup_count(&id(raw)), 1);
        }
    }

    #[tokio::test]
    async fn test_analyze_back_edge_with_branch() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "1234.5678", "First Paper", &["2345.6789"]);
        paper(&source, "2345.6789", "Second Paper", &["1234.5678", "3456.7890"]);
        paper(&source, "3456.7890", "Third Paper", &[]);
        let tally = analyzer(source.clone()).analyze("1234.5678", 5).await.unwrap();
        assert_eq!(tally.len(), 3);
        for title in ["First Paper", "Second Paper", "Third Paper"] {
            assert_eq!(tally.count(title), 1);
        }
        assert_eq!(source.lookup_count(&id("1234.5678")), 1);
    }

    #[tokio::test]
    async fn test_analyze_respects_depth_bound() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Depth Zero", &["2102.00002"]);
        paper(&source, "2102.00002", "Depth One", &["2103.00003"]);
        paper(&source, "2103.00003", "Depth Two", &["2104.00004"]);
        paper(&source, "2104.00004", "Depth Three", &[]);
        let tally = analyzer(source.clone()).analyze("2101.00001", 2).await.unwrap();
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.count("Depth Two"), 1);
        assert_eq!(tally.count("Depth Three"), 0);
        assert_eq!(source.lookup_count(&id("2104.00004")), 0);
    }

    #[tokio::test]
    async fn test_analyze_diamond_counts_shared_child_once() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Root", &["2102.00002", "2103.00003"]);
        paper(&source, "2102.00002", "Left", &["2104.00004"]);
        paper(&source, "2103.00003", "Right", &["2104.00004"]);
        paper(&source, "2104.00004", "Shared", &[]);
        let tally = analyzer(source.clone()).analyze("2101.00001", 3).await.unwrap();
        assert_eq!(tally.count("Shared"), 1);
        assert_eq!(source.lookup_count(&id("2104.00004")), 1);
    }

    #[tokio::test]
    async fn test_analyze_keeps_partial_results_on_failed_child() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Root", &["2102.00002", "2199.99999"]);
        paper(&source, "2102.00002", "Reachable Child", &[]);
        let tally = analyzer(source).analyze("2101.00001", 2).await.unwrap();
        assert_eq!(tally.count("Root"), 1);
        assert_eq!(tally.count("Reachable Child"), 1);
        assert_eq!(tally.len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_accepts_abs_url_locator() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "1706.03762", "Attention Is All You Need", &[]);
        let tally = analyzer(source)
            .analyze("https://arxiv.org/abs/1706.03762v5", 1)
            .await
            .unwrap();
        assert_eq!(tally.count("Attention Is All You Need"), 1);
    }

    #[tokio::test]
    async fn test_analyze_rejects_unparsable_locator() {
        let source = Arc::new(StaticPaperSource::new());
        let err = analyzer(source)
            .analyze("https://example.com/papers/42", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, CitegraphError::UnparsableLocator { .. }));
    }

    #[tokio::test]
    async fn test_analyze_rejects_depth_zero() {
        let source = Arc::new(StaticPaperSource::new());
        let err = analyzer(source).analyze("1706.03762", 0).await.unwrap_err();
        assert!(matches!(err, CitegraphError::DepthOutOfRange { depth: 0, .. }));
    }

    #[tokio::test]
    async fn test_analyze_rejects_depth_over_max() {
        let source = Arc::new(StaticPaperSource::new());
        let err = analyzer(source).analyze("1706.03762", 11).await.unwrap_err();
        assert!(matches!(err, CitegraphError::DepthOutOfRange { depth: 11, .. }));
    }

    #[tokio::test]
    async fn test_analyze_unfetchable_root_is_no_citations() {
        let source = Arc::new(StaticPaperSource::new());
        let err = analyzer(source).analyze("1706.03762", 3).await.unwrap_err();
        assert!(matches!(err, CitegraphError::NoCitations));
    }

    #[tokio::test]
    async fn test_traverse_depth_zero_expands_root_only() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Root", &["2102.00002"]);
        paper(&source, "2102.00002", "Child", &[]);
        let engine = analyzer(source.clone());
        let tally = engine.traverse(id("2101.00001"), 0).await;
        assert_eq!(tally.count("Root"), 1);
        assert_eq!(tally.len(), 1);
        assert_eq!(source.lookup_count(&id("2102.00002")), 0);
    }

    #[tokio::test]
    async fn test_analyze_ranked_output_ordering() {
        let source = Arc::new(StaticPaperSource::new());
        paper(&source, "2101.00001", "Root", &["2102.00002", "2103.00003", "2104.00004"]);
        paper(&source, "2102.00002", "Popular", &[]);
        paper(&source, "2103.00003", "Popular", &[]);
        paper(&source, "2104.00004", "Rare", &[]);
        let tally = analyzer(source).analyze("2101.00001", 1).await.unwrap();
        let ranked = tally.ranked(2);
        assert_eq!(ranked[0].title, "Popular");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked.len(), 2);
    }
}
