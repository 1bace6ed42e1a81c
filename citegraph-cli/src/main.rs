//! Command-line interface for citegraph.

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use citegraph_core::{Analyzer, RankedTitle, load_config};

/// Analyze the citation graph of an arXiv paper.
#[derive(Parser, Debug)]
#[command(name = "citegraph", version, about)]
struct Cli {
    /// Paper to analyze: an arXiv abs URL or a bare id like 1706.03762
    locator: String,

    /// Citation hops to follow from the root (1-10)
    #[arg(short = 'd', long)]
    depth: Option<u32>,

    /// Number of titles to show in the report
    #[arg(short = 't', long, default_value_t = 10)]
    top: usize,

    /// Emit the ranked tally as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Skip the on-disk paper cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "citegraph", "citegraph")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "citegraph.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let mut config =
        load_config().map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;
    if cli.no_cache {
        config.cache.enabled = false;
    }
    let depth = cli.depth.unwrap_or(config.traversal.default_max_depth);

    let analyzer = Analyzer::from_config(&config)?;
    let tally = analyzer.analyze(&cli.locator, depth).await?;

    let ranked = tally.ranked(cli.top);
    tracing::debug!("Rendering {} of {} titles", ranked.len(), tally.len());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        print!("{}", render_ranked(&ranked));
    }

    Ok(())
}

fn render_ranked(ranked: &[RankedTitle]) -> String {
    let mut out = String::new();
    for (i, row) in ranked.iter().enumerate() {
        let times = if row.count == 1 { "time" } else { "times" };
        out.push_str(&format!(
            "{}. {}\n   Cited {} {}\n",
            i + 1,
            row.title,
            row.count,
            times
        ));
    }
    out
}
