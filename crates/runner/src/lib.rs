//! Tenor Runner
//!
//! Command-line driver for market data windows:
//! - **cli**: argument parsing (`tenor perpetuals|futures ...`)
//! - **session**: open a window, apply boundary moves, print, snapshot
//! - **report**: one-line rendering of each row type

pub mod cli;
pub mod report;
pub mod session;

pub use cli::{Cli, Command, WindowArgs};
pub use report::ReportRow;
pub use session::{load_api_config, run_window};
