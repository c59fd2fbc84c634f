//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::launcher;
use crate::adapters::sqlite_adapter::{SqliteAdapter, latest_schema_version};
use crate::adapters::web::{AppState, build_router};
use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{STOCK_INFO_LOOKBACK, StockInfo};
use crate::domain::sentiment::{analyze_batch, summarize};
use crate::domain::settings::Settings;
use crate::domain::symbol::normalize_for_lookup;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Stock market dashboard built on TradingView widgets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Open the dashboard in the default browser once listening
        #[arg(long)]
        open: bool,
    },
    /// Create or upgrade the database schema
    Migrate {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check prerequisites, migrate, then serve and open a browser
    Launch {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        no_browser: bool,
    },
    /// Load daily bars from a CSV file
    Import {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show price summary for a stored symbol, or list stored symbols
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Score text with the keyword sentiment analyzer
    Sentiment {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config, open } => run_serve(config.as_deref(), open),
        Command::Migrate { config } => run_migrate(config.as_deref()),
        Command::Launch { config, no_browser } => run_launch(config.as_deref(), no_browser),
        Command::Import {
            symbol,
            file,
            config,
        } => run_import(&symbol, &file, config.as_deref()),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), config.as_deref()),
        Command::Sentiment { texts } => {
            init_logging(log::LevelFilter::Warn);
            run_sentiment(&texts)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// `RUST_LOG` wins over the configured level. Safe to call more than once.
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Without a path every setting takes its default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, DashboardError> {
    match path {
        Some(p) => FileConfigAdapter::from_file(p).map_err(|e| DashboardError::ConfigParse {
            file: p.display().to_string(),
            reason: e.to_string(),
        }),
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, DashboardError> {
    let config = load_config(path)?;
    let settings = Settings::from_config(&config)?;
    init_logging(settings.log_level);
    if let Some(p) = path {
        log::info!("loaded config from {}", p.display());
    }
    Ok(settings)
}

/// Opens the store and applies pending migrations.
pub fn migrate_store(settings: &Settings) -> Result<(SqliteAdapter, usize), DashboardError> {
    let store = SqliteAdapter::from_settings(settings)?;
    let applied = store.migrate()?;
    Ok((store, applied))
}

fn run_migrate(config_path: Option<&Path>) -> Result<(), DashboardError> {
    let settings = load_settings(config_path)?;
    let (store, applied) = migrate_store(&settings)?;
    let version = store.schema_version()?;
    if applied == 0 {
        println!("Database is up to date (schema version {version})");
    } else {
        println!("Applied {applied} migration(s); schema version {version}");
    }
    Ok(())
}

fn run_serve(config_path: Option<&Path>, open: bool) -> Result<(), DashboardError> {
    let settings = load_settings(config_path)?;
    let store = SqliteAdapter::from_settings(&settings)?;
    let version = store.schema_version()?;
    if version < latest_schema_version() {
        log::warn!(
            "database schema is at version {version}, expected {}; run `stockdash migrate`",
            latest_schema_version()
        );
    }
    let open = open || settings.open_browser;
    serve(settings, store, open)
}

fn run_launch(config_path: Option<&Path>, no_browser: bool) -> Result<(), DashboardError> {
    let settings = load_settings(config_path)?;

    eprintln!("Checking prerequisites...");
    launcher::preflight(&settings)?;

    eprintln!("Migrating database {}...", settings.db_path.display());
    let (store, applied) = migrate_store(&settings)?;
    log::info!("applied {applied} migration(s)");

    serve(settings, store, !no_browser)
}

/// Binds the listener, then serves until Ctrl-C.
pub fn serve(settings: Settings, store: SqliteAdapter, open: bool) -> Result<(), DashboardError> {
    let store = Arc::new(store);
    let listen = settings.listen;
    let state = AppState {
        data_port: store.clone(),
        sentiment_port: store,
        settings,
    };
    let router = build_router(state);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(listen).await?;
        let url = launcher::dashboard_url(listener.local_addr()?);
        eprintln!("Serving dashboard at {url} (Ctrl-C to stop)");
        if open {
            launcher::open_browser(&url);
        }
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        log::info!("server stopped");
        Ok::<(), DashboardError>(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Reads `file` into the store under the normalized symbol. Returns rows
/// written.
pub fn import_file(store: &dyn DataPort, symbol: &str, file: &Path) -> Result<usize, DashboardError> {
    let symbol = normalize_for_lookup(symbol);
    let bars = csv_adapter::read_bars(file, &symbol)?;
    if bars.is_empty() {
        return Err(DashboardError::Import {
            line: 1,
            reason: "file has no data rows".into(),
        });
    }
    store.insert_bars(&bars)
}

fn run_import(symbol: &str, file: &Path, config_path: Option<&Path>) -> Result<(), DashboardError> {
    let settings = load_settings(config_path)?;
    let (store, _) = migrate_store(&settings)?;
    let written = import_file(&store, symbol, file)?;
    println!(
        "Imported {written} bars for {} from {}",
        normalize_for_lookup(symbol),
        file.display()
    );
    Ok(())
}

pub fn lookup_info(store: &dyn DataPort, symbol: &str) -> Result<StockInfo, DashboardError> {
    let symbol = normalize_for_lookup(symbol);
    let bars = store.fetch_recent_bars(&symbol, STOCK_INFO_LOOKBACK)?;
    StockInfo::compute(&symbol, &bars)
}

fn run_info(symbol: Option<&str>, config_path: Option<&Path>) -> Result<(), DashboardError> {
    let settings = load_settings(config_path)?;
    let store = SqliteAdapter::from_settings(&settings)?;

    let Some(symbol) = symbol else {
        let symbols = store.list_symbols()?;
        if symbols.is_empty() {
            eprintln!("No stored symbols; load some with `stockdash import`");
        }
        for s in &symbols {
            println!("{s}");
        }
        return Ok(());
    };

    let info = lookup_info(&store, symbol)?;
    println!("Symbol:        {}", info.symbol);
    println!("Price:         {:.2}", info.current_price);
    println!("Change 1d:     {:+.2}%", info.price_change_1d);
    println!("Change 7d:     {:+.2}%", info.price_change_7d);
    println!("Change 30d:    {:+.2}%", info.price_change_30d);
    println!("Volume:        {}", info.volume);
    println!("Last updated:  {}", info.last_updated);
    Ok(())
}

fn run_sentiment(texts: &[String]) -> Result<(), DashboardError> {
    let results = analyze_batch(texts);
    for r in &results {
        println!("{:<8} {:.3}  {}", r.sentiment, r.confidence, r.text);
    }
    if let Ok(summary) = summarize(&results) {
        println!();
        println!(
            "Overall: {} ({:.1}%), average confidence {:.3}",
            summary.dominant_sentiment, summary.dominant_percentage, summary.average_confidence
        );
        println!("{}", summary.market_outlook);
    }
    Ok(())
}
