//! One-shot lookup of dog-friendly spots inside a bounding box.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dogspot::domain::ports::{GeodataSource, SpotsQuery};
use dogspot::domain::query::DEFAULT_QUERY_TIMEOUT_SECONDS;
use dogspot::domain::{BoundingBox, Category, SpotSearchService};
use dogspot::outbound::overpass::{
    DEFAULT_OVERPASS_ENDPOINTS, DEFAULT_REQUEST_TIMEOUT, OverpassHttpSource,
};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// `find-spots` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "find-spots",
    about = "Look up dog-friendly spots inside a bounding box via Overpass",
    version
)]
struct CliArgs {
    /// Viewport as `south,west,north,east`.
    #[arg(long, value_name = "south,west,north,east", allow_hyphen_values = true)]
    bbox: BoundingBox,
    /// Overpass endpoint; repeat to set the failover order.
    #[arg(long = "endpoint", value_name = "url")]
    endpoints: Vec<Url>,
    /// Only print spots in this category (snake_case id).
    #[arg(long)]
    category: Option<Category>,
    /// Client-side request timeout per endpoint, in seconds.
    #[arg(long, value_name = "seconds")]
    timeout: Option<u64>,
    /// Server-side query timeout embedded in the query, in seconds.
    #[arg(long, value_name = "seconds", default_value_t = DEFAULT_QUERY_TIMEOUT_SECONDS)]
    query_timeout: u32,
    /// Print the result as JSON instead of one line per spot.
    #[arg(long)]
    json: bool,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let timeout = args
        .timeout
        .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

    let service =
        SpotSearchService::new(build_sources(&args.endpoints, timeout)?)
            .with_query_timeout(args.query_timeout);
    let spots = service
        .find_spots(&args.bbox)
        .await
        .map_err(|error| io::Error::other(format!("spot lookup failed: {error}")))?;

    let spots: Vec<_> = spots
        .into_iter()
        .filter(|spot| args.category.is_none_or(|category| spot.category == category))
        .collect();

    if args.json {
        let rendered = serde_json::to_string_pretty(&spots)
            .map_err(|error| io::Error::other(format!("render JSON: {error}")))?;
        println!("{rendered}");
    } else {
        for spot in &spots {
            println!(
                "{}\t{}\t{}\t{},{}",
                spot.id, spot.category, spot.name, spot.lat, spot.lng
            );
        }
        println!("count={}", spots.len());
    }
    Ok(())
}

fn build_sources(endpoints: &[Url], timeout: Duration) -> io::Result<Vec<Arc<dyn GeodataSource>>> {
    let endpoints = if endpoints.is_empty() {
        DEFAULT_OVERPASS_ENDPOINTS
            .iter()
            .map(|raw| Url::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| io::Error::other(format!("default endpoint: {error}")))?
    } else {
        endpoints.to_vec()
    };
    endpoints
        .into_iter()
        .map(|endpoint| {
            OverpassHttpSource::new(endpoint, timeout)
                .map(|source| Arc::new(source) as Arc<dyn GeodataSource>)
                .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))
        })
        .collect()
}
