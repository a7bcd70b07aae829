use anyhow::Context;
use log::info;
use std::io::Write;
use std::path::Path;
use tenor_gateway::{ApiConfig, ConfigError, load_config, load_default_config};
use tenor_market_data::{RangeCache, SeriesStrategy};

use crate::cli::WindowArgs;
use crate::report::ReportRow;

/// Configuration from `path`, or the built-in defaults
pub fn load_api_config(path: Option<&Path>) -> Result<ApiConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => load_default_config(),
    }
}

/// Open a window, apply the requested moves, print it, optionally save it
pub async fn run_window<S, W>(strategy: S, args: &WindowArgs, out: &mut W) -> anyhow::Result<()>
where
    S: SeriesStrategy,
    S::Row: ReportRow,
    W: Write,
{
    let mut window = RangeCache::open(strategy, args.currency, args.start, args.end, args.granularity)
        .await
        .context("opening window")?;

    // Move the end first when the new start lies past the current end
    let end_first = args.new_start.is_some_and(|start| start > window.end());
    if end_first {
        apply_end(&mut window, args).await?;
        apply_start(&mut window, args).await?;
    } else {
        apply_start(&mut window, args).await?;
        apply_end(&mut window, args).await?;
    }

    writeln!(
        out,
        "{} {} {}..{} @ {}: {} rows",
        window.currency(),
        window.kind(),
        window.start(),
        window.end(),
        window.granularity(),
        window.len()
    )?;
    writeln!(out, "{}", <S::Row as ReportRow>::header())?;
    for row in window.rows() {
        writeln!(out, "{}", row.line())?;
    }

    if let Some(path) = &args.save {
        let written = window.save(path).context("saving snapshot")?;
        info!("Snapshot written to {}", written.display());
    }
    Ok(())
}

async fn apply_start<S: SeriesStrategy>(
    window: &mut RangeCache<S>,
    args: &WindowArgs,
) -> anyhow::Result<()> {
    if let Some(start) = args.new_start {
        let update = window
            .set_start(start)
            .await
            .with_context(|| format!("moving start to {}", start))?;
        info!("set_start({}): {:?}", start, update);
    }
    Ok(())
}

async fn apply_end<S: SeriesStrategy>(
    window: &mut RangeCache<S>,
    args: &WindowArgs,
) -> anyhow::Result<()> {
    if let Some(end) = args.new_end {
        let update = window
            .set_end(end)
            .await
            .with_context(|| format!("moving end to {}", end))?;
        info!("set_end({}): {:?}", end, update);
    }
    Ok(())
}
