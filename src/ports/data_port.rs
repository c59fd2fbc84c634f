//! Stored price history port trait.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::StockBar;

pub trait DataPort {
    /// The most recent `limit` bars for `symbol`, oldest first.
    fn fetch_recent_bars(&self, symbol: &str, limit: usize)
        -> Result<Vec<StockBar>, DashboardError>;

    /// Insert or replace bars keyed by (symbol, date). Returns rows written.
    fn insert_bars(&self, bars: &[StockBar]) -> Result<usize, DashboardError>;

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError>;
}
