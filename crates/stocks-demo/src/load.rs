// File: crates/stocks-demo/src/load.rs
// Summary: Daily index CSV loading (date/open/close/volume) into dashboard records.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use crossfilter_core::Record;
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
pub fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

pub fn load_path(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    load_records(file)
}

/// Parse records from CSV with a header row. Header lookup is case-insensitive.
/// Rows with an unparsable date are skipped; unparsable numbers become NaN.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    debug!(?headers, "csv headers");

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_date = idx(&["date", "day"]).context("missing `date` column")?;
    let i_open = idx(&["open", "o"]);
    let i_close = idx(&["close", "c"]);
    let i_volume = idx(&["volume", "vol", "v"]);
    if i_open.is_none() || i_close.is_none() || i_volume.is_none() {
        warn!("one of open/close/volume columns is missing; its values load as NaN");
    }

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("reading CSV row {}", row + 1))?;
        let field = |i: Option<usize>| i.and_then(|ix| rec.get(ix)).unwrap_or("");
        let raw_date = field(Some(i_date)).trim();
        let date = match NaiveDate::parse_from_str(raw_date, DATE_FORMAT) {
            Ok(d) => d,
            Err(e) => {
                warn!(row = row + 1, raw_date, error = %e, "skipping row with unparsable date");
                continue;
            }
        };
        out.push(Record::from_text(date, field(i_open), field(i_close), field(i_volume)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rows_and_coerces_bad_numbers() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   01/02/1985,1200.5,0,0,1205.25,1000000\n\
                   not-a-date,1,1,1,1,1\n\
                   01/03/1985,1205.25,0,0,,2000000\n";
        let records = load_records(csv.as_bytes()).expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(1985, 1, 2).expect("valid date"));
        assert_eq!(records[0].open, 1200.5);
        assert_eq!(records[0].close, 1205.25);
        assert_eq!(records[0].volume, 1_000_000.0);
        assert!(records[1].close.is_nan());
    }

    #[test]
    fn missing_date_column_is_an_error() {
        let err = load_records("open,close\n1,2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn swaps_csv_and_cvs() {
        assert_eq!(swap_ext(Path::new("ndx.cvs")), Some(PathBuf::from("ndx.csv")));
        assert_eq!(swap_ext(Path::new("ndx.csv")), Some(PathBuf::from("ndx.cvs")));
        assert_eq!(swap_ext(Path::new("ndx.txt")), None);
    }
}
