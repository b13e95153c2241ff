//! PunyURL server binary.
//!
//! ```bash
//! # Sweep every 500ms, evict entries unused for 2 minutes, listen on 9090
//! puny-url -e 500ms --ttl 2m -p 9090
//! ```
//!
//! Flags override the matching environment variables; see [`puny_url::config`].

use anyhow::{Context, Result};
use clap::Parser;
use puny_url::config::{Config, parse_duration};
use puny_url::server;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// URL shortener with a self-evicting in-memory cache.
#[derive(Parser, Debug)]
#[command(name = "puny-url")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Time between cache eviction sweeps, e.g. `1s` or `500ms`
    #[arg(short = 'e', long = "evict-interval", value_name = "DURATION", value_parser = parse_duration)]
    evict_interval: Option<Duration>,

    /// Time after which an unused cache entry is evicted, e.g. `30s` or `2m`
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    ttl: Option<Duration>,

    /// Port to run the server on
    #[arg(short, long)]
    port: Option<u16>,

    /// Only log warnings and errors
    #[arg(short, long)]
    silent: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(interval) = self.evict_interval {
            config.evict_interval = interval;
        }
        if let Some(ttl) = self.ttl {
            config.cache_ttl = ttl;
        }
        if let Some(port) = self.port {
            config.set_port(port);
        }
        if self.silent {
            config.silent = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    init_tracing(&config)?;
    config.print_summary();

    server::run(config).await
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(config.effective_log_level())
        .with_context(|| format!("Invalid log filter '{}'", config.effective_log_level()))?;

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
