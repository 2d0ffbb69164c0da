// File: crates/stocks-demo/src/events.rs
// Summary: Parses scripted filter events ("year=2001", "fluctuation=-2..3", "quarter=Q1,Q3", "reset").

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use crossfilter_core::{DimensionId, Filter, Key, StockDashboard};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Raw selection as typed on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Exact(String),
    /// Half-open `lo..hi`.
    Range(String, String),
    AnyOf(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// `dim=<selection>`; an empty selection clears the dimension's filter.
    Set { dimension: String, selection: Option<Selection> },
    Reset,
}

impl Event {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("reset") {
            return Ok(Event::Reset);
        }
        let (dimension, value) = raw
            .split_once('=')
            .with_context(|| format!("event `{raw}` is not `dimension=value` or `reset`"))?;
        let dimension = canonical_dimension(dimension.trim())?.to_string();
        let value = value.trim();
        let selection = if value.is_empty() {
            None
        } else if let Some((lo, hi)) = value.split_once("..") {
            Some(Selection::Range(lo.trim().to_string(), hi.trim().to_string()))
        } else if value.contains(',') {
            Some(Selection::AnyOf(value.split(',').map(|v| v.trim().to_string()).collect()))
        } else {
            Some(Selection::Exact(value.to_string()))
        };
        Ok(Event::Set { dimension, selection })
    }

    /// Apply to the dashboard, returning a one-line description of the effect.
    pub fn apply(&self, dash: &mut StockDashboard) -> Result<String> {
        match self {
            Event::Reset => {
                let delta = dash.reset_all();
                Ok(format!("reset all filters (+{} records)", delta.added))
            }
            Event::Set { dimension, selection } => {
                let dim = resolve(dash, dimension)?;
                let filter = selection.as_ref().map(|s| to_filter(dimension, s)).transpose()?;
                let described = format!("{filter:?}");
                let delta = dash.set_filter(dim, filter)?;
                Ok(format!(
                    "{dimension} <- {described} (+{} / -{} records, {} active)",
                    delta.added,
                    delta.removed,
                    dash.aggregator().active_count()
                ))
            }
        }
    }
}

fn canonical_dimension(name: &str) -> Result<&'static str> {
    Ok(match name.to_lowercase().replace('-', "_").as_str() {
        "year" => "year",
        "date" => "date",
        "month" => "month",
        "gain_or_loss" | "gain_loss" | "gainorloss" => "gain_or_loss",
        "fluctuation" | "change" => "fluctuation",
        "quarter" => "quarter",
        "day_of_week" | "weekday" | "dow" => "day_of_week",
        other => bail!("unknown dimension `{other}`"),
    })
}

fn resolve(dash: &StockDashboard, dimension: &str) -> Result<DimensionId> {
    dash.dimension_named(dimension)
        .with_context(|| format!("dashboard has no `{dimension}` dimension"))
}

fn to_filter(dimension: &str, selection: &Selection) -> Result<Filter> {
    Ok(match selection {
        Selection::Exact(v) => Filter::Exact(parse_key(dimension, v)?),
        Selection::Range(lo, hi) => Filter::Range { lo: parse_key(dimension, lo)?, hi: parse_key(dimension, hi)? },
        Selection::AnyOf(vs) => Filter::any_of(vs.iter().map(|v| parse_key(dimension, v)).collect::<Result<Vec<_>>>()?),
    })
}

/// Parse a typed value into the key shape `dimension` produces.
pub fn parse_key(dimension: &str, raw: &str) -> Result<Key> {
    let raw = raw.trim();
    match dimension {
        "year" | "fluctuation" => {
            let v: i64 = raw.trim_end_matches('%').parse().with_context(|| format!("`{raw}` is not an integer"))?;
            Ok(Key::Int(v))
        }
        "date" => {
            let d = NaiveDate::parse_from_str(raw, "%m/%d/%Y").with_context(|| format!("`{raw}` is not MM/DD/YYYY"))?;
            Ok(Key::Date(d))
        }
        "month" => {
            let d = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                .with_context(|| format!("`{raw}` is not YYYY-MM"))?;
            Ok(Key::Date(d))
        }
        "gain_or_loss" => match raw.to_lowercase().as_str() {
            "gain" => Ok(Key::from("Gain")),
            "loss" => Ok(Key::from("Loss")),
            _ => bail!("`{raw}` is neither Gain nor Loss"),
        },
        "quarter" => {
            let q = raw.to_uppercase();
            if !matches!(q.as_str(), "Q1" | "Q2" | "Q3" | "Q4") {
                bail!("`{raw}` is not a quarter (Q1..Q4)");
            }
            Ok(Key::Text(q))
        }
        "day_of_week" => {
            let name = raw.rsplit('.').next().unwrap_or(raw);
            let day = WEEKDAYS
                .iter()
                .position(|w| w.eq_ignore_ascii_case(name))
                .with_context(|| format!("`{raw}` is not a weekday"))?;
            Ok(Key::Text(format!("{}.{}", day, WEEKDAYS[day])))
        }
        other => bail!("unknown dimension `{other}`"),
    }
}
