//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No file given: every lookup falls through to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[server]
listen = 127.0.0.1:8080
static_dir = assets

[widgets]
default_symbol = NYSE:IBM
theme = dark
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("server", "listen"),
            Some("127.0.0.1:8080".to_string())
        );
        assert_eq!(
            adapter.get_string("widgets", "default_symbol"),
            Some("NYSE:IBM".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[server]\nlisten = 1\n").unwrap();
        assert_eq!(adapter.get_string("server", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("server", "listen"), None);
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 4);
        assert!(adapter.get_bool("server", "open_browser", true));
        assert_eq!(
            adapter.get_string_or("widgets", "locale", "en"),
            "en".to_string()
        );
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[sqlite]\npool_size = 8\n").unwrap();
        assert_eq!(adapter.get_int("sqlite", "pool_size", 0), 8);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[sqlite]\npool_size = many\n").unwrap();
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 4);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string("[x]\nratio = 0.25\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_double("x", "ratio", 0.0), 0.25);
        assert_eq!(adapter.get_double("x", "bad", 9.5), 9.5);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[server]\na = true\nb = yes\nc = On\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("server", "a", false));
        assert!(adapter.get_bool("server", "b", false));
        assert!(adapter.get_bool("server", "c", false));
        assert!(!adapter.get_bool("server", "d", true));
        assert!(!adapter.get_bool("server", "e", true));
        assert!(!adapter.get_bool("server", "f", true));
        assert!(adapter.get_bool("server", "g", true));
    }

    #[test]
    fn get_string_or_trims_and_skips_blank() {
        let adapter =
            FileConfigAdapter::from_string("[widgets]\nlocale =   \ntheme =  dark \n").unwrap();
        assert_eq!(adapter.get_string_or("widgets", "locale", "en"), "en");
        assert_eq!(adapter.get_string_or("widgets", "theme", "light"), "dark");
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[sqlite]\npath = /tmp/stockdash.db\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("sqlite", "path"),
            Some("/tmp/stockdash.db".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/stockdash.ini");
        assert!(result.is_err());
    }
}
