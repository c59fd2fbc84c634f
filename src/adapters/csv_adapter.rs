//! CSV price history reader used by `stockdash import`.
//!
//! Columns are located by header name (case-insensitive), so both
//! `date,open,high,low,close,volume` and Yahoo-style exports with an extra
//! `Adj Close` column load. Dates may carry a time suffix; only the date part
//! is kept.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::StockBar;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub fn read_bars(path: &Path, symbol: &str) -> Result<Vec<StockBar>, DashboardError> {
    let file = File::open(path)?;
    parse_bars(file, symbol)
}

pub fn parse_bars<R: Read>(reader: R, symbol: &str) -> Result<Vec<StockBar>, DashboardError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|e| DashboardError::Import {
        line: 1,
        reason: format!("unreadable header: {e}"),
    })?;
    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| DashboardError::Import {
                line: 1,
                reason: format!("missing {name} column"),
            })?;
    }

    let mut bars = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = result.map_err(|e| DashboardError::Import {
            line,
            reason: e.to_string(),
        })?;

        let raw_date = field(&record, index[0], 0, line)?;
        let date_part = raw_date.get(..10).unwrap_or(raw_date);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            DashboardError::Import {
                line,
                reason: format!("invalid date '{raw_date}': {e}"),
            }
        })?;

        // Some exports write volume as a float ("1234.0")
        let volume = number(&record, index[5], 5, line)?;
        if volume < 0.0 {
            return Err(DashboardError::Import {
                line,
                reason: "volume must be a non-negative number".into(),
            });
        }

        bars.push(StockBar {
            symbol: symbol.to_string(),
            date,
            open: number(&record, index[1], 1, line)?,
            high: number(&record, index[2], 2, line)?,
            low: number(&record, index[3], 3, line)?,
            close: number(&record, index[4], 4, line)?,
            volume: volume.round() as i64,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

fn field(
    record: &csv::StringRecord,
    position: usize,
    col: usize,
    line: usize,
) -> Result<&str, DashboardError> {
    record.get(position).ok_or_else(|| DashboardError::Import {
        line,
        reason: format!("missing {} value", COLUMNS[col]),
    })
}

fn number(
    record: &csv::StringRecord,
    position: usize,
    col: usize,
    line: usize,
) -> Result<f64, DashboardError> {
    let value: f64 = field(record, position, col, line)?
        .parse()
        .map_err(|e| DashboardError::Import {
            line,
            reason: format!("invalid {} value: {e}", COLUMNS[col]),
        })?;
    // f64 parsing accepts "NaN" and "inf"
    if !value.is_finite() {
        return Err(DashboardError::Import {
            line,
            reason: format!("invalid {} value: must be finite", COLUMNS[col]),
        });
    }
    Ok(value)
}
