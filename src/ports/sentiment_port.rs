//! Sentiment history port trait.

use crate::domain::error::DashboardError;
use crate::domain::sentiment::{Sentiment, SentimentResult};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SentimentRecord {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub source: String,
    /// RFC 3339 timestamp, UTC.
    pub created_at: String,
}

pub trait SentimentPort {
    fn record_sentiment(&self, result: &SentimentResult) -> Result<i64, DashboardError>;

    /// All or nothing; ids come back in input order.
    fn record_batch(&self, results: &[SentimentResult]) -> Result<Vec<i64>, DashboardError>;

    /// Newest first.
    fn recent_sentiment(&self, limit: usize) -> Result<Vec<SentimentRecord>, DashboardError>;
}
