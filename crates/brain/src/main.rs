use std::sync::Arc;
use std::time::Duration;

use alpha_flow_brain::{BrainScheduler, SignalBrain};
use alpha_flow_core::ConfigLoader;
use alpha_flow_data::{
    MarketDataProvider, NewsProvider, SimulatedMarketProvider, SimulatedNewsProvider,
};
use alpha_flow_ledger::SignalLedger;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "alpha-flow")]
#[command(about = "Options-flow trading signal brain", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::load(&cli.config)?;
    info!(
        tickers = config.app.tickers.len(),
        interval_secs = config.app.scheduler_interval_secs,
        "Starting signal brain"
    );

    let market: Arc<dyn MarketDataProvider> =
        Arc::new(SimulatedMarketProvider::new(config.market_data.api_key.clone()));
    let news: Arc<dyn NewsProvider> =
        Arc::new(SimulatedNewsProvider::new(config.news.api_key.clone()));
    let ledger = SignalLedger::open(
        &config.storage.path,
        config.queues.intraday_expiry_minutes,
        config.queues.swing_expiry_days,
    )
    .await?;

    let brain = SignalBrain::new(&config, market, news, ledger)?;
    let scheduler = BrainScheduler::new(Duration::from_secs(config.app.scheduler_interval_secs));
    let tickers = config.app.tickers.clone();

    tokio::select! {
        () = scheduler.run(brain, tickers) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
    Ok(())
}
