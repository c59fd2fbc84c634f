//! Keyword-based sentiment scoring for financial headlines.
//!
//! Scoring counts which keywords occur in the lower-cased text (substring
//! match, each keyword at most once), so "higher" scores for "high".

use std::fmt;

pub const KEYWORD_SOURCE: &str = "Keyword Analysis";

const BULLISH_KEYWORDS: [&str; 10] = [
    "bullish",
    "rally",
    "surge",
    "jump",
    "gain",
    "rise",
    "high",
    "record",
    "breakthrough",
    "innovation",
];

const BEARISH_KEYWORDS: [&str; 10] = [
    "bearish",
    "crash",
    "decline",
    "drop",
    "fall",
    "low",
    "bankruptcy",
    "uncertainty",
    "concern",
    "weak",
];

const NEUTRAL_CONFIDENCE: f64 = 0.6;
const MAX_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Tie-break order when picking a dominant sentiment.
    pub const ORDER: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SentimentResult {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub source: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Distribution {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl Distribution {
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Bullish => self.bullish,
            Sentiment::Bearish => self.bearish,
            Sentiment::Neutral => self.neutral,
        }
    }

    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Bullish => self.bullish += 1,
            Sentiment::Bearish => self.bearish += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.bullish + self.bearish + self.neutral
    }

    /// Highest count; ties resolve in [`Sentiment::ORDER`].
    pub fn dominant(&self) -> Sentiment {
        let mut best = Sentiment::ORDER[0];
        for s in Sentiment::ORDER {
            if self.count(s) > self.count(best) {
                best = s;
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Percentages {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NewsAnalysis {
    pub overall_sentiment: Sentiment,
    pub sentiment_distribution: Distribution,
    pub average_confidence: f64,
    pub total_news_items: usize,
    pub analyzed_items: usize,
    pub detailed_results: Vec<SentimentResult>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SentimentSummary {
    pub total_analyzed: usize,
    pub sentiment_distribution: Distribution,
    pub sentiment_percentages: Percentages,
    pub dominant_sentiment: Sentiment,
    pub dominant_percentage: f64,
    pub average_confidence: f64,
    pub market_outlook: &'static str,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SentimentError {
    #[error("No news items provided")]
    NoNewsItems,

    #[error("No sentiment results to summarize")]
    NoResults,
}

/// A headline with optional body text.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.content).trim().to_string()
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn keyword_score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

pub fn analyze(text: &str) -> SentimentResult {
    let lower = text.to_lowercase();
    let bullish = keyword_score(&lower, &BULLISH_KEYWORDS);
    let bearish = keyword_score(&lower, &BEARISH_KEYWORDS);

    let (sentiment, confidence) = if bullish > bearish {
        (Sentiment::Bullish, MAX_CONFIDENCE.min(0.5 + bullish as f64 * 0.1))
    } else if bearish > bullish {
        (Sentiment::Bearish, MAX_CONFIDENCE.min(0.5 + bearish as f64 * 0.1))
    } else {
        (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
    };

    SentimentResult {
        text: text.to_string(),
        sentiment,
        confidence: round_to(confidence, 3),
        source: KEYWORD_SOURCE,
    }
}

pub fn analyze_batch<S: AsRef<str>>(texts: &[S]) -> Vec<SentimentResult> {
    texts.iter().map(|t| analyze(t.as_ref())).collect()
}

pub fn analyze_news(items: &[NewsItem]) -> Result<NewsAnalysis, SentimentError> {
    if items.is_empty() {
        return Err(SentimentError::NoNewsItems);
    }

    let texts: Vec<String> = items.iter().map(NewsItem::combined_text).collect();
    let results = analyze_batch(&texts);

    let mut distribution = Distribution::default();
    let mut total_confidence = 0.0;
    for r in &results {
        distribution.add(r.sentiment);
        total_confidence += r.confidence;
    }

    let analyzed = results.len();
    Ok(NewsAnalysis {
        overall_sentiment: distribution.dominant(),
        sentiment_distribution: distribution,
        average_confidence: round_to(total_confidence / analyzed as f64, 3),
        total_news_items: items.len(),
        analyzed_items: analyzed,
        detailed_results: results,
    })
}

pub fn summarize(results: &[SentimentResult]) -> Result<SentimentSummary, SentimentError> {
    if results.is_empty() {
        return Err(SentimentError::NoResults);
    }

    let mut distribution = Distribution::default();
    let mut total_confidence = 0.0;
    for r in results {
        distribution.add(r.sentiment);
        total_confidence += r.confidence;
    }

    let total = distribution.total() as f64;
    let pct = |s: Sentiment| round_to(distribution.count(s) as f64 / total * 100.0, 1);
    let percentages = Percentages {
        bullish: pct(Sentiment::Bullish),
        bearish: pct(Sentiment::Bearish),
        neutral: pct(Sentiment::Neutral),
    };

    let dominant = distribution.dominant();
    let dominant_percentage = pct(dominant);

    Ok(SentimentSummary {
        total_analyzed: results.len(),
        sentiment_percentages: percentages,
        dominant_sentiment: dominant,
        dominant_percentage,
        average_confidence: round_to(total_confidence / total, 3),
        market_outlook: market_outlook(dominant, dominant_percentage),
        sentiment_distribution: distribution,
    })
}

pub fn market_outlook(dominant: Sentiment, percentage: f64) -> &'static str {
    if percentage >= 70.0 {
        match dominant {
            Sentiment::Bullish => "Strongly Bullish - Market sentiment is very positive",
            Sentiment::Bearish => "Strongly Bearish - Market sentiment is very negative",
            Sentiment::Neutral => "Neutral - Market shows balanced sentiment",
        }
    } else if percentage >= 50.0 {
        match dominant {
            Sentiment::Bullish => "Moderately Bullish - Market sentiment is positive",
            Sentiment::Bearish => "Moderately Bearish - Market sentiment is negative",
            Sentiment::Neutral => "Neutral - Market shows mixed sentiment",
        }
    } else {
        "Mixed - No clear sentiment direction"
    }
}

/// Fixed headlines used for the news page mood panel and demos.
pub fn sample_news() -> Vec<NewsItem> {
    vec![
        NewsItem::new(
            "Tech Stocks Rally on Strong Earnings Reports",
            "Major technology companies reported better-than-expected quarterly earnings, driving the NASDAQ to new heights.",
        ),
        NewsItem::new(
            "Federal Reserve Signals Potential Rate Hike",
            "The Federal Reserve indicated it may raise interest rates in the coming months to combat inflation.",
        ),
        NewsItem::new(
            "Market Shows Mixed Signals Amid Economic Data",
            "Trading was volatile as investors weighed conflicting economic indicators and corporate earnings reports.",
        ),
        NewsItem::new(
            "Oil Prices Surge on Supply Concerns",
            "Crude oil prices jumped to multi-month highs as geopolitical tensions raised concerns about supply disruptions.",
        ),
        NewsItem::new(
            "Retail Sales Decline for Third Consecutive Month",
            "Consumer spending continued to weaken, raising concerns about economic growth and consumer confidence.",
        ),
        NewsItem::new(
            "Housing Market Remains Stable",
            "Home prices and sales volumes showed little change from the previous month, indicating market stability.",
        ),
    ]
}
