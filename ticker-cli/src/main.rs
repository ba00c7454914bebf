//! Ticker price follower
//!
//! Opens the price feed, subscribes to the tickers given on the command
//! line and logs every price the feed delivers.

use std::time::Duration;

use clap::Parser;
use rust_decimal::Decimal;
use ticker_core::Ticker;
use ticker_stream::{FeedConfig, TickerFeed};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Time given to the connection task to write unsubscribe frames on exit
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tickers to follow, e.g. BTC ETH DOGE
    #[arg(required = true)]
    tickers: Vec<String>,

    /// Streamer endpoint (overrides TICKER_FEED_URL)
    #[arg(long)]
    url: Option<String>,

    /// API key (overrides TICKER_FEED_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Stop after this many seconds instead of running until interrupted
    #[arg(long)]
    duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ticker_stream=debug")),
        )
        .init();

    let args = Args::parse();

    let mut config = FeedConfig::from_env()?;
    if let Some(url) = args.url {
        config.endpoint = url;
    }
    if args.api_key.is_some() {
        config.api_key = args.api_key;
    }
    if config.api_key.is_none() {
        info!("No API key configured - the streamer may reject subscriptions");
    }

    info!("Starting ticker feed: {:?}", config);
    let feed = TickerFeed::connect(config)?;
    let multiplexer = feed.multiplexer();

    let tickers: Vec<Ticker> = args.tickers.iter().map(|t| Ticker::from(t.as_str())).collect();
    for ticker in &tickers {
        let name = ticker.clone();
        multiplexer.subscribe_to_ticker(ticker.clone(), move |price: Decimal| {
            if price.is_zero() {
                warn!("{}: subscription rejected by the streamer", name);
            } else {
                info!("{}: {}", name, price);
            }
        });
    }

    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = feed.closed() => {
            warn!("Feed connection closed");
            return Ok(());
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted, unsubscribing");
        }
        _ = deadline => {
            info!("Duration elapsed, unsubscribing");
        }
    }

    for ticker in tickers {
        multiplexer.unsubscribe_from_ticker(ticker);
    }
    tokio::time::sleep(SHUTDOWN_GRACE).await;

    Ok(())
}
