//! Daily price bars and the summary derived from them.

use chrono::NaiveDate;

use super::error::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct StockBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Latest price and recent percentage changes for a symbol.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StockInfo {
    pub symbol: String,
    pub current_price: f64,
    pub price_change_1d: f64,
    pub price_change_7d: f64,
    pub price_change_30d: f64,
    pub volume: i64,
    pub last_updated: String,
}

/// Bars needed to compute the widest change window.
pub const STOCK_INFO_LOOKBACK: usize = 31;

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Percentage change of the last close against the close `days` bars earlier.
/// Zero when there are not enough bars or the earlier close is zero.
pub fn price_change(bars: &[StockBar], days: usize) -> f64 {
    if bars.len() < days + 1 {
        return 0.0;
    }
    let current = bars[bars.len() - 1].close;
    let previous = bars[bars.len() - 1 - days].close;
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

impl StockInfo {
    /// `bars` must be sorted by date ascending.
    pub fn compute(symbol: &str, bars: &[StockBar]) -> Result<Self, DashboardError> {
        let last = bars.last().ok_or_else(|| DashboardError::NoData {
            symbol: symbol.to_string(),
        })?;

        Ok(Self {
            symbol: symbol.to_string(),
            current_price: round2(last.close),
            price_change_1d: round2(price_change(bars, 1)),
            price_change_7d: round2(price_change(bars, 7)),
            price_change_30d: round2(price_change(bars, 30)),
            volume: last.volume,
            last_updated: last.date.format("%Y-%m-%d").to_string(),
        })
    }
}
