//! # Citegraph Core
//!
//! Citation graph analysis for arXiv papers. Starting from a paper
//! locator, the engine walks the citation graph breadth-first to a
//! bounded depth, fetching papers through a rate-limit-aware client
//! with an on-disk cache, and tallies how often each title is reached.
//!
//! The typical entry point is [`Analyzer`]:
//!
//! ```no_run
//! use citegraph_core::{Analyzer, load_config};
//!
//! # async fn run() -> citegraph_core::Result<()> {
//! let config = load_config()?;
//! let analyzer = Analyzer::from_config(&config)?;
//! let tally = analyzer.analyze("https://arxiv.org/abs/1706.03762", 3).await?;
//! for row in tally.ranked(10) {
//!     println!("{} ({})", row.title, row.count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod arxiv;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod tally;
pub mod traverse;
pub mod types;
pub mod visited;

pub use arxiv::ArxivClient;
pub use cache::{JsonFileCache, MemoryCache, NoopCache, PaperCache};
pub use config::{Config, load_config};
pub use error::{CacheError, CitegraphError, FetchError, Result};
pub use extract::IdExtractor;
pub use fetch::{PaperFetcher, PaperSource, StaticPaperSource};
pub use tally::{CitationTally, RankedTitle};
pub use traverse::{Analyzer, MAX_DEPTH, MIN_DEPTH};
pub use types::{PaperId, PaperRecord};
pub use visited::VisitedSet;
