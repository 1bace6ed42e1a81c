//! Configuration loading and defaults.
//!
//! Configuration is layered: built-in defaults, then the user's
//! `config.toml` from the platform config directory, then environment
//! variables prefixed with `CITEGRAPH_` (nested keys split on `__`,
//! e.g. `CITEGRAPH_TRAVERSAL__GROUP_SIZE=5`).

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Root configuration for the citegraph engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote paper service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Minimum gap between consecutive requests to the service.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_user_agent() -> String {
    "citegraph/0.1 (https://github.com/citegraph-rs/citegraph)".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_min_request_interval_ms() -> u64 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

/// Retry behavior for individual paper lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base delay before each attempt; attempt `n` waits `base * (n + 1)`.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Retries after the first attempt when the service rate-limits.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry_base_delay_ms: default_retry_base_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Graph expansion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_max_depth")]
    pub default_max_depth: u32,
    /// Papers fetched concurrently per group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Pause between fetch groups.
    #[serde(default = "default_group_delay_ms")]
    pub group_delay_ms: u64,
}

fn default_max_depth() -> u32 {
    5
}

fn default_group_size() -> usize {
    3
}

fn default_group_delay_ms() -> u64 {
    2000
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_max_depth: default_max_depth(),
            group_size: default_group_size(),
            group_delay_ms: default_group_delay_ms(),
        }
    }
}

/// On-disk paper cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache directory override. Defaults to the platform cache dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: None,
        }
    }
}

impl CacheConfig {
    /// Directory the file cache should live in.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        ProjectDirs::from("dev", "citegraph", "citegraph")
            .map(|dirs| dirs.cache_dir().join("papers"))
            .unwrap_or_else(|| PathBuf::from(".citegraph-cache"))
    }
}

/// Load configuration from defaults, the user config file, and the
/// environment.
pub fn load_config() -> Result<Config, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(proj_dirs) = ProjectDirs::from("dev", "citegraph", "citegraph") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            figment = figment.merge(Toml::file(config_path));
        }
    }

    figment = figment.merge(Env::prefixed("CITEGRAPH_").split("__"));

    figment.extract().map_err(Box::new)
}
