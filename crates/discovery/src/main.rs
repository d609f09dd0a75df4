//! Discovery CLI: query relays and print the merged snapshot as JSON.

use clap::Parser;
use nostr_discovery::{
    bootstrap_relays, discover, directory, DirectoryConfig, DiscoveryConfig, DEFAULT_CONCURRENCY,
    DEFAULT_RESULT_CAP, DEFAULT_TIMEOUT_MS, CORE_RELAYS, DEFAULT_DIRECTORY_URL,
};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "nostr-discovery",
    about = "Discover servers announced on Nostr relays"
)]
struct Args {
    /// Relay URL to query (repeatable); bypasses the directory bootstrap
    #[arg(long = "relay", value_name = "URL")]
    relays: Vec<String>,

    /// Per-relay timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Maximum concurrently open relay connections
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-relay result cap
    #[arg(long, default_value_t = DEFAULT_RESULT_CAP)]
    limit: u64,

    /// Announcement event kind
    #[arg(long, default_value_t = nostr::KIND_SERVER_ANNOUNCEMENT)]
    kind: u16,

    /// Relay directory endpoint
    #[arg(long, default_value = DEFAULT_DIRECTORY_URL)]
    directory_url: String,

    /// Number of directory relays to sample
    #[arg(long, default_value_t = directory::DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Skip the directory and query only the core relay set
    #[arg(long)]
    no_directory: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let relays = if !args.relays.is_empty() {
        args.relays.clone()
    } else if args.no_directory {
        CORE_RELAYS.iter().map(|s| s.to_string()).collect()
    } else {
        bootstrap_relays(&DirectoryConfig {
            url: args.directory_url.clone(),
            sample_size: args.sample_size,
            ..Default::default()
        })
        .await
    };

    let config = DiscoveryConfig {
        relays,
        timeout: Duration::from_millis(args.timeout_ms),
        concurrency: args.concurrency,
        limit: args.limit,
        kind: args.kind,
    };

    let report = match discover(&config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("discovery failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to encode report: {}", e);
            ExitCode::FAILURE
        }
    }
}
