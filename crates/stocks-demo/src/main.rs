// File: crates/stocks-demo/src/main.rs
// Summary: Demo loads the daily index CSV, wires the dashboard, replays filter events and prints snapshots.

mod events;
mod load;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use crossfilter_core::{DashboardOptions, GroupScope, QuarterConvention, StockDashboard};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::events::Event;

#[derive(Debug, Parser)]
#[command(name = "stocks-demo", about = "Cross-filter a daily stock index and print every chart's groups")]
struct Args {
    /// Input CSV with date (MM/DD/YYYY), open, close and volume columns.
    #[arg(default_value = "ndx.csv")]
    input: String,

    /// Filter event applied in order: `dim=value`, `dim=lo..hi`, `dim=a,b`, `dim=` (clear) or `reset`.
    #[arg(short, long = "event")]
    events: Vec<String>,

    /// Reproduce the historical quarter boundaries (April falls into Q4).
    #[arg(long)]
    legacy_quarters: bool,

    /// Groups ignore the filter on their own dimension.
    #[arg(long)]
    crossfilter_scope: bool,

    /// Divisor applied to monthly volume.
    #[arg(long, default_value_t = crossfilter_core::types::VOLUME_SCALE)]
    volume_scale: f64,

    /// Print a snapshot after every event, not only at the end.
    #[arg(long)]
    each: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let events = args
        .events
        .iter()
        .map(|raw| Event::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let (path, used_alt) = load::resolve_path(&args.input)?;
    info!(path = %path.display(), "using input file");
    if used_alt {
        info!("extension swapped between .csv/.cvs");
    }

    let records = load::load_path(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    info!(records = records.len(), "loaded records");
    if records.is_empty() {
        anyhow::bail!("no records loaded; check headers/delimiter.");
    }

    let options = DashboardOptions {
        volume_scale: args.volume_scale,
        quarter_convention: if args.legacy_quarters { QuarterConvention::Legacy } else { QuarterConvention::Calendar },
        group_scope: if args.crossfilter_scope { GroupScope::ExcludeOwnDimension } else { GroupScope::AllFilters },
    };
    let mut dash = StockDashboard::new(records, options)?;

    for event in &events {
        let summary = event.apply(&mut dash)?;
        println!("{summary}");
        if args.each {
            print!("{}", report::render(&dash)?);
        }
    }

    if !args.each || events.is_empty() {
        print!("{}", report::render(&dash)?);
    }
    Ok(())
}
