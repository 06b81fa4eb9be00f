//! Climate data example
//!
//! Scrapes the NOAA local climatological data listing for 2021, keeps the
//! station files last modified at the target minute, downloads them and
//! prints the highest `HourlyDryBulbTemperature` of each as JSON.
//!
//! ```bash
//! cargo run --example climate_max -- "2024-01-19 10:27"
//! ```

use batch_dl::{BatchDownloader, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENDPOINT: &str = "https://www.ncei.noaa.gov/data/local-climatological-data/access/2021/";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_dl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let target = std::env::args().nth(1).unwrap_or_else(|| "2024-01-19 10:27".to_string());

    let mut config = Config::default();
    config.listing.endpoint = Some(ENDPOINT.to_string());
    config.listing.target_timestamp = Some(target);

    let downloader = BatchDownloader::new(config)?;
    let report = downloader.discover_and_aggregate().await?;

    println!("{}", report.to_json_pretty()?);

    Ok(())
}
