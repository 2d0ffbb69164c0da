// File: crates/stocks-demo/src/report.rs
// Summary: Text rendering of the dashboard's group snapshots, one block per chart.

use std::fmt::Write as _;

use anyhow::Result;
use crossfilter_core::labels::{self, Bubble};
use crossfilter_core::StockDashboard;

/// Months shown per monthly series (most recent last).
const MONTH_ROWS: usize = 12;

pub fn render(dash: &StockDashboard) -> Result<String> {
    let agg = dash.aggregator();
    let mut out = String::new();

    writeln!(out, "== {} of {} records selected", agg.active_count(), agg.records().len())?;

    writeln!(out, "-- yearly performance")?;
    for (key, p) in agg.group(dash.yearly_performance)?.all() {
        if p.count == 0 {
            continue;
        }
        let b = Bubble::new(key, p);
        writeln!(
            out,
            "{:>6}  gain {:>10.2}  gain% {:>7.2}  fluct% {:>7.2}  days {}",
            b.label, b.x, b.y, b.radius, p.count
        )?;
    }

    writeln!(out, "-- gain / loss")?;
    for (key, count) in agg.group(dash.gain_or_loss_count)?.all() {
        writeln!(out, "{}  {}", labels::gain_or_loss_label(agg, dash.gain_or_loss, key, *count)?, count)?;
    }

    writeln!(out, "-- quarter volume")?;
    for (key, volume) in agg.group(dash.quarter_volume)?.all() {
        writeln!(out, "{key}  {:.0}", volume.value())?;
    }

    writeln!(out, "-- day of week")?;
    for (key, count) in agg.group(dash.day_of_week_count)?.all() {
        writeln!(out, "{:<4} {}", labels::day_of_week_label(key), count)?;
    }

    writeln!(out, "-- daily change histogram")?;
    for (key, count) in agg.group(dash.fluctuation_count)?.all() {
        if *count > 0 {
            let tick = key.as_int().map_or_else(|| key.to_string(), labels::percent_tick);
            writeln!(out, "{tick:>5}  {}", "#".repeat((*count).min(60) as usize))?;
        }
    }

    writeln!(out, "-- monthly index average / move / volume (last {MONTH_ROWS} months)")?;
    let averages = agg.group(dash.index_avg_by_month)?;
    let moves = agg.group(dash.monthly_move)?;
    let volumes = agg.group(dash.volume_by_month)?;
    let months: Vec<_> = averages.all().filter(|(_, a)| a.days > 0).collect();
    for (key, avg) in months.iter().rev().take(MONTH_ROWS).rev() {
        let Some(month) = key.as_date() else { continue };
        let movement = moves.get(key).map_or(f64::NAN, |s| s.value());
        let volume = volumes.get(key).map_or(f64::NAN, |s| s.value());
        let title = labels::move_chart_title(month, avg.avg).replace('\n', "  avg ");
        writeln!(out, "{title}  move {movement:.2}  volume {volume:.2}")?;
    }

    Ok(out)
}
