//! Error types for the citegraph core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering fetching, caching, configuration, and traversal input domains.

/// Top-level error type for the citegraph core library.
#[derive(Debug, thiserror::Error)]
pub enum CitegraphError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("No identifier found in locator: {locator}")]
    UnparsableLocator { locator: String },

    #[error("Depth {depth} is outside the supported range 1-{max}")]
    DepthOutOfRange { depth: u32, max: u32 },

    #[error("No citations found for this paper")]
    NoCitations,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from a single remote paper lookup.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Rate limited by the paper service")]
    RateLimited,

    #[error("Paper service returned status {status} for '{id}'")]
    Status { id: String, status: u16 },

    #[error("Paper '{id}' not found")]
    NotFound { id: String },

    #[error("Response for '{id}' is missing a title")]
    MissingTitle { id: String },
}

/// Errors from the paper cache store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A type alias for results using the top-level `CitegraphError`.
pub type Result<T> = std::result::Result<T, CitegraphError>;
