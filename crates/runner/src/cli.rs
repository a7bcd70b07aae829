use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tenor_core::{Currency, Granularity, parse_date};

#[derive(Parser, Debug)]
#[command(name = "tenor")]
#[command(about = "Cached derivatives history windows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Every perpetual market of a currency, tagged by market
    Perpetuals(WindowArgs),
    /// Per-date aggregate of every live dated future
    Futures(WindowArgs),
}

impl Command {
    pub fn args(&self) -> &WindowArgs {
        match self {
            Command::Perpetuals(args) | Command::Futures(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Underlying asset (BTC, ETH)
    #[arg(long, default_value = "BTC")]
    pub currency: Currency,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: NaiveDate,

    /// Bucket width (1m, 5m, 15m, 30m, 1h, 2h, 4h, 6h, 12h, 1d)
    #[arg(long, default_value = "1d")]
    pub granularity: Granularity,

    /// API configuration file (JSON); built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Move the start bound after opening
    #[arg(long, value_parser = parse_date)]
    pub new_start: Option<NaiveDate>,

    /// Move the end bound after opening
    #[arg(long, value_parser = parse_date)]
    pub new_end: Option<NaiveDate>,

    /// Write a snapshot here (".json" appended when no extension)
    #[arg(long)]
    pub save: Option<PathBuf>,
}
