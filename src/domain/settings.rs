//! Application settings resolved from configuration.
//!
//! Every key has a default, so an empty config yields a working local setup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::error::DashboardError;
use crate::domain::symbol::DEFAULT_SYMBOL;
use crate::domain::widget::{Theme, WidgetSettings};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_DB_PATH: &str = "stockdash.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub static_dir: PathBuf,
    pub open_browser: bool,
    pub default_symbol: String,
    pub widgets: WidgetSettings,
    pub db_path: PathBuf,
    pub pool_size: u32,
    pub log_level: log::LevelFilter,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        Ok(Self {
            listen: parse_listen(config)?,
            static_dir: PathBuf::from(config.get_string_or("server", "static_dir", DEFAULT_STATIC_DIR)),
            open_browser: config.get_bool("server", "open_browser", false),
            default_symbol: config.get_string_or("widgets", "default_symbol", DEFAULT_SYMBOL),
            widgets: parse_widgets(config)?,
            db_path: PathBuf::from(config.get_string_or("sqlite", "path", DEFAULT_DB_PATH)),
            pool_size: parse_pool_size(config)?,
            log_level: parse_log_level(config)?,
        })
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_listen(config: &dyn ConfigPort) -> Result<SocketAddr, DashboardError> {
    let value = config.get_string_or("server", "listen", DEFAULT_LISTEN);
    value
        .parse()
        .map_err(|_| invalid("server", "listen", format!("'{value}' is not a socket address")))
}

fn parse_widgets(config: &dyn ConfigPort) -> Result<WidgetSettings, DashboardError> {
    let theme_str = config.get_string_or("widgets", "theme", "light");
    let theme = Theme::parse(&theme_str)
        .ok_or_else(|| invalid("widgets", "theme", "theme must be light or dark"))?;
    Ok(WidgetSettings {
        theme,
        locale: config.get_string_or("widgets", "locale", "en"),
    })
}

fn parse_pool_size(config: &dyn ConfigPort) -> Result<u32, DashboardError> {
    let value = config.get_int("sqlite", "pool_size", 4);
    if !(1..=64).contains(&value) {
        return Err(invalid("sqlite", "pool_size", "pool_size must be between 1 and 64"));
    }
    Ok(value as u32)
}

fn parse_log_level(config: &dyn ConfigPort) -> Result<log::LevelFilter, DashboardError> {
    let value = config.get_string_or("log", "level", DEFAULT_LOG_LEVEL);
    value
        .parse()
        .map_err(|_| invalid("log", "level", format!("unknown log level '{value}'")))
}
