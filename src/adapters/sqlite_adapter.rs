//! SQLite store for price history and sentiment records.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::StockBar;
use crate::domain::sentiment::{Sentiment, SentimentResult};
use crate::domain::settings::Settings;
use crate::ports::data_port::DataPort;
use crate::ports::sentiment_port::{SentimentPort, SentimentRecord};
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};

/// Ordered schema migrations. Applied versions are tracked in
/// `schema_migrations`; never edit an entry once released, append instead.
const MIGRATIONS: &[(i64, &str)] = &[
    (
        1,
        "CREATE TABLE stock_data (
            symbol TEXT NOT NULL,
            date TEXT NOT NULL,
            open REAL NOT NULL,
            high REAL NOT NULL,
            low REAL NOT NULL,
            close REAL NOT NULL,
            volume INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (symbol, date)
        );
        CREATE INDEX idx_stock_data_date ON stock_data(date);",
    ),
    (
        2,
        "CREATE TABLE sentiment_analysis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            sentiment TEXT NOT NULL CHECK (sentiment IN ('bullish', 'bearish', 'neutral')),
            confidence REAL NOT NULL,
            source TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX idx_sentiment_created_at ON sentiment_analysis(created_at);",
    ),
];

fn db_err(e: r2d2::Error) -> DashboardError {
    DashboardError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> DashboardError {
    DashboardError::DatabaseQuery {
        reason: e.to_string(),
    }
}

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_settings(settings: &Settings) -> Result<Self, DashboardError> {
        let manager = SqliteConnectionManager::file(&settings.db_path);
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .build(manager)
            .map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, DashboardError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, DashboardError> {
        self.pool.get().map_err(db_err)
    }

    /// Apply pending migrations. Returns how many were applied.
    pub fn migrate(&self) -> Result<usize, DashboardError> {
        let mut conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )
        .map_err(query_err)?;

        let current: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        let mut applied = 0;
        for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
            let tx = conn.transaction().map_err(query_err)?;
            tx.execute_batch(sql).map_err(query_err)?;
            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(query_err)?;
            tx.commit().map_err(query_err)?;
            log::info!("applied migration {version}");
            applied += 1;
        }

        Ok(applied)
    }

    pub fn schema_version(&self) -> Result<i64, DashboardError> {
        let conn = self.conn()?;
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
                [],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        if !exists {
            return Ok(0);
        }
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(query_err)
    }
}

pub fn latest_schema_version() -> i64 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}

impl DataPort for SqliteAdapter {
    fn fetch_recent_bars(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<StockBar>, DashboardError> {
        let conn = self.conn()?;

        let query = "SELECT symbol, date, open, high, low, close, volume
                     FROM stock_data
                     WHERE symbol = ?1
                     ORDER BY date DESC
                     LIMIT ?2";

        let mut stmt = conn.prepare(query).map_err(query_err)?;

        let rows = stmt
            .query_map(params![symbol, limit as i64], |row| {
                let date_str: String = row.get(1)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(StockBar {
                    symbol: row.get(0)?,
                    date,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    volume: row.get(6)?,
                })
            })
            .map_err(query_err)?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row.map_err(query_err)?);
        }
        bars.reverse();

        Ok(bars)
    }

    fn insert_bars(&self, bars: &[StockBar]) -> Result<usize, DashboardError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let now = chrono::Utc::now().to_rfc3339();

        let mut written = 0;
        for bar in bars {
            written += tx
                .execute(
                    "INSERT OR REPLACE INTO stock_data
                        (symbol, date, open, high, low, close, volume, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        bar.symbol,
                        bar.date.format("%Y-%m-%d").to_string(),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume,
                        now
                    ],
                )
                .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(written)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM stock_data ORDER BY symbol")
            .map_err(query_err)?;

        let rows = stmt.query_map([], |row| row.get(0)).map_err(query_err)?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(row.map_err(query_err)?);
        }
        Ok(symbols)
    }
}

fn insert_sentiment(conn: &Connection, result: &SentimentResult) -> Result<i64, DashboardError> {
    conn.execute(
        "INSERT INTO sentiment_analysis (text, sentiment, confidence, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            result.text,
            result.sentiment.as_str(),
            result.confidence,
            result.source,
            chrono::Utc::now().to_rfc3339()
        ],
    )
    .map_err(query_err)?;
    Ok(conn.last_insert_rowid())
}

impl SentimentPort for SqliteAdapter {
    fn record_sentiment(&self, result: &SentimentResult) -> Result<i64, DashboardError> {
        let conn = self.conn()?;
        insert_sentiment(&conn, result)
    }

    fn record_batch(&self, results: &[SentimentResult]) -> Result<Vec<i64>, DashboardError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let ids = results
            .iter()
            .map(|r| insert_sentiment(&tx, r))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit().map_err(query_err)?;
        Ok(ids)
    }

    fn recent_sentiment(&self, limit: usize) -> Result<Vec<SentimentRecord>, DashboardError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, text, sentiment, confidence, source, created_at
                 FROM sentiment_analysis
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let label: String = row.get(2)?;
                let sentiment = Sentiment::parse(&label).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        format!("unknown sentiment '{label}'").into(),
                    )
                })?;
                Ok(SentimentRecord {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    sentiment,
                    confidence: row.get(3)?,
                    source: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_err)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::analyze;

    fn migrated() -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.migrate().unwrap();
        adapter
    }

    fn bar(symbol: &str, day: u32, close: f64) -> StockBar {
        StockBar {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn migrate_is_idempotent() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        assert_eq!(adapter.schema_version().unwrap(), 0);
        assert_eq!(adapter.migrate().unwrap(), MIGRATIONS.len());
        assert_eq!(adapter.migrate().unwrap(), 0);
        assert_eq!(adapter.schema_version().unwrap(), latest_schema_version());
    }

    #[test]
    fn fetch_recent_bars_returns_newest_window_oldest_first() {
        let adapter = migrated();
        let bars: Vec<_> = (1..=5).map(|d| bar("AAPL", d, 100.0 + d as f64)).collect();
        assert_eq!(adapter.insert_bars(&bars).unwrap(), 5);

        let fetched = adapter.fetch_recent_bars("AAPL", 3).unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(fetched[2].close, 105.0);
    }

    #[test]
    fn insert_replaces_same_date() {
        let adapter = migrated();
        adapter.insert_bars(&[bar("AAPL", 1, 100.0)]).unwrap();
        adapter.insert_bars(&[bar("AAPL", 1, 150.0)]).unwrap();

        let fetched = adapter.fetch_recent_bars("AAPL", 10).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].close, 150.0);
    }

    #[test]
    fn fetch_unknown_symbol_is_empty() {
        let adapter = migrated();
        assert!(adapter.fetch_recent_bars("NOPE", 10).unwrap().is_empty());
    }

    #[test]
    fn list_symbols_sorted_distinct() {
        let adapter = migrated();
        adapter
            .insert_bars(&[bar("MSFT", 1, 1.0), bar("AAPL", 1, 1.0), bar("AAPL", 2, 1.0)])
            .unwrap();
        assert_eq!(adapter.list_symbols().unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn sentiment_records_newest_first() {
        let adapter = migrated();
        let first = adapter.record_sentiment(&analyze("Stocks rally")).unwrap();
        let second = adapter.record_sentiment(&analyze("Market crash")).unwrap();
        assert!(second > first);

        let records = adapter.recent_sentiment(10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Market crash");
        assert_eq!(records[0].sentiment, Sentiment::Bearish);
        assert_eq!(records[1].sentiment, Sentiment::Bullish);
        assert_eq!(records[1].source, "Keyword Analysis");

        assert_eq!(adapter.recent_sentiment(1).unwrap().len(), 1);
    }

    #[test]
    fn record_batch_returns_ids_in_order() {
        let adapter = migrated();
        let batch = [analyze("Stocks rally"), analyze("Market crash"), analyze("Flat day")];
        let ids = adapter.record_batch(&batch).unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let records = adapter.recent_sentiment(10).unwrap();
        assert_eq!(records[0].id, ids[2]);
        assert_eq!(records[0].text, "Flat day");
    }

    #[test]
    fn record_batch_failure_stores_nothing() {
        let adapter = migrated();
        adapter
            .conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_text BEFORE INSERT ON sentiment_analysis
                 WHEN NEW.text = 'reject me'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let batch = [analyze("Stocks rally"), analyze("reject me")];
        assert!(matches!(
            adapter.record_batch(&batch),
            Err(DashboardError::DatabaseQuery { .. })
        ));
        assert!(adapter.recent_sentiment(10).unwrap().is_empty());
    }

    #[test]
    fn queries_before_migration_fail() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        assert!(matches!(
            adapter.fetch_recent_bars("AAPL", 1),
            Err(DashboardError::DatabaseQuery { .. })
        ));
    }

    #[test]
    fn file_database_persists_between_adapters() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            db_path: dir.path().join("test.sqlite3"),
            ..test_settings()
        };

        let adapter = SqliteAdapter::from_settings(&settings).unwrap();
        adapter.migrate().unwrap();
        adapter.insert_bars(&[bar("AAPL", 1, 10.0)]).unwrap();
        drop(adapter);

        let reopened = SqliteAdapter::from_settings(&settings).unwrap();
        assert_eq!(reopened.migrate().unwrap(), 0);
        assert_eq!(reopened.fetch_recent_bars("AAPL", 5).unwrap().len(), 1);
    }

    fn test_settings() -> Settings {
        use crate::adapters::file_config_adapter::FileConfigAdapter;
        Settings::from_config(&FileConfigAdapter::empty()).unwrap()
    }
}
