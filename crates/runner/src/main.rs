use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tenor_gateway::HttpHistorySource;
use tenor_market_data::{FuturesStrategy, PerpetualsStrategy};
use tenor_runner::{Cli, Command, load_api_config, run_window};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let args = cli.command.args();

    let config = load_api_config(args.config.as_deref()).context("loading API config")?;
    let api_key = config.resolve_api_key()?;
    let source = Arc::new(
        HttpHistorySource::from_config(&config, api_key).context("building HTTP client")?,
    );
    log::info!("Using {} (page size {})", config.base_url, config.page_size);

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Command::Perpetuals(args) => {
            run_window(PerpetualsStrategy::from_source(source), args, &mut stdout).await
        }
        Command::Futures(args) => {
            run_window(FuturesStrategy::from_source(source), args, &mut stdout).await
        }
    }
}
