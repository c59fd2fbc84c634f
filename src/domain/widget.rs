//! TradingView embed widgets.
//!
//! A widget is a hosted `embed-widget-*.js` script whose inline body is a JSON
//! configuration. This module only builds that configuration; the browser does
//! everything else.

use serde_json::{json, Value};

use super::symbol::Symbol;

const EMBED_BASE: &str = "https://s3.tradingview.com/external-embedding/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub theme: Theme,
    pub locale: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    TickerTape,
    AdvancedChart,
    SymbolInfo,
    SymbolOverview,
    TechnicalAnalysis,
    Financials,
    CompanyProfile,
    Timeline,
}

impl WidgetKind {
    fn script_name(&self) -> &'static str {
        match self {
            Self::TickerTape => "embed-widget-ticker-tape.js",
            Self::AdvancedChart => "embed-widget-advanced-chart.js",
            Self::SymbolInfo => "embed-widget-symbol-info.js",
            Self::SymbolOverview => "embed-widget-symbol-overview.js",
            Self::TechnicalAnalysis => "embed-widget-technical-analysis.js",
            Self::Financials => "embed-widget-financials.js",
            Self::CompanyProfile => "embed-widget-symbol-profile.js",
            Self::Timeline => "embed-widget-timeline.js",
        }
    }

    pub fn script_src(&self) -> String {
        format!("{EMBED_BASE}{}", self.script_name())
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Self::TickerTape => "Markets",
            Self::AdvancedChart => "Chart",
            Self::SymbolInfo => "Quote",
            Self::SymbolOverview => "Performance",
            Self::TechnicalAnalysis => "Technical Analysis",
            Self::Financials => "Fundamentals",
            Self::CompanyProfile => "Company Profile",
            Self::Timeline => "Top Stories",
        }
    }

    /// CSS class of the container, used by the stylesheet to size it.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::TickerTape => "widget widget-tape",
            Self::AdvancedChart => "widget widget-chart",
            Self::Timeline => "widget widget-tall",
            _ => "widget",
        }
    }
}

/// Indices shown on every ticker tape.
const TAPE_SYMBOLS: [(&str, &str); 5] = [
    ("FOREXCOM:SPXUSD", "S&P 500 Index"),
    ("FOREXCOM:NSXUSD", "US 100 Cash CFD"),
    ("FX_IDC:EURUSD", "EUR to USD"),
    ("BITSTAMP:BTCUSD", "Bitcoin"),
    ("BITSTAMP:ETHUSD", "Ethereum"),
];

#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub script_src: String,
    pub heading: &'static str,
    pub css_class: &'static str,
    /// Configuration JSON, already escaped for a `<script>` body.
    pub config_json: String,
}

impl Widget {
    pub fn new(kind: WidgetKind, symbol: &Symbol, settings: &WidgetSettings) -> Self {
        let config = config_for(kind, symbol, settings);
        Self {
            kind,
            script_src: kind.script_src(),
            heading: kind.heading(),
            css_class: kind.css_class(),
            config_json: script_safe_json(&config),
        }
    }
}

fn config_for(kind: WidgetKind, symbol: &Symbol, settings: &WidgetSettings) -> Value {
    let theme = settings.theme.as_str();
    let locale = settings.locale.as_str();
    let symbol = symbol.as_str();

    match kind {
        WidgetKind::TickerTape => {
            let symbols: Vec<Value> = TAPE_SYMBOLS
                .iter()
                .map(|(pro_name, title)| json!({ "proName": pro_name, "title": title }))
                .collect();
            json!({
                "symbols": symbols,
                "showSymbolLogo": true,
                "isTransparent": false,
                "displayMode": "adaptive",
                "colorTheme": theme,
                "locale": locale,
            })
        }
        WidgetKind::AdvancedChart => json!({
            "autosize": true,
            "symbol": symbol,
            "interval": "D",
            "timezone": "Etc/UTC",
            "theme": theme,
            "style": "1",
            "locale": locale,
            "allow_symbol_change": true,
            "calendar": false,
            "support_host": "https://www.tradingview.com",
        }),
        WidgetKind::SymbolInfo => json!({
            "symbol": symbol,
            "width": "100%",
            "locale": locale,
            "colorTheme": theme,
            "isTransparent": false,
        }),
        WidgetKind::SymbolOverview => json!({
            "symbols": [[symbol, format!("{symbol}|1D")]],
            "chartOnly": false,
            "width": "100%",
            "height": "100%",
            "locale": locale,
            "colorTheme": theme,
            "autosize": true,
            "showVolume": false,
            "chartType": "area",
            "dateRanges": ["1d|1", "1m|30", "3m|60", "12m|1D", "60m|1W", "all|1M"],
        }),
        WidgetKind::TechnicalAnalysis => json!({
            "interval": "1D",
            "width": "100%",
            "height": 450,
            "isTransparent": false,
            "symbol": symbol,
            "showIntervalTabs": true,
            "displayMode": "single",
            "locale": locale,
            "colorTheme": theme,
        }),
        WidgetKind::Financials => json!({
            "isTransparent": false,
            "largeChartUrl": "",
            "displayMode": "regular",
            "width": "100%",
            "height": 550,
            "colorTheme": theme,
            "symbol": symbol,
            "locale": locale,
        }),
        WidgetKind::CompanyProfile => json!({
            "width": "100%",
            "height": 400,
            "isTransparent": false,
            "colorTheme": theme,
            "symbol": symbol,
            "locale": locale,
        }),
        WidgetKind::Timeline => json!({
            "feedMode": "symbol",
            "symbol": symbol,
            "isTransparent": false,
            "displayMode": "regular",
            "width": "100%",
            "height": 550,
            "colorTheme": theme,
            "locale": locale,
        }),
    }
}

/// Serialize `value` so it can sit inside a `<script>` element: characters
/// that could close the element or start markup are emitted as `\uXXXX`.
pub fn script_safe_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> WidgetSettings {
        WidgetSettings::default()
    }

    #[test]
    fn chart_config_carries_symbol_and_theme() {
        let widget = Widget::new(
            WidgetKind::AdvancedChart,
            &Symbol::new("NYSE:IBM"),
            &WidgetSettings {
                theme: Theme::Dark,
                locale: "de".into(),
            },
        );
        let config: Value = serde_json::from_str(&widget.config_json).unwrap();
        assert_eq!(config["symbol"], "NYSE:IBM");
        assert_eq!(config["theme"], "dark");
        assert_eq!(config["locale"], "de");
        assert!(widget.config_json.contains("\"NYSE:IBM\""));
    }

    #[test]
    fn script_src_points_at_hosted_embed() {
        let widget = Widget::new(WidgetKind::Timeline, &Symbol::default(), &settings());
        assert_eq!(
            widget.script_src,
            "https://s3.tradingview.com/external-embedding/embed-widget-timeline.js"
        );
    }

    #[test]
    fn ticker_tape_ignores_symbol() {
        let widget = Widget::new(WidgetKind::TickerTape, &Symbol::new("XYZ"), &settings());
        assert!(!widget.config_json.contains("XYZ"));
        let config: Value = serde_json::from_str(&widget.config_json).unwrap();
        assert_eq!(config["symbols"].as_array().unwrap().len(), TAPE_SYMBOLS.len());
    }

    #[test]
    fn tape_titles_are_escaped_but_still_valid_json() {
        let widget = Widget::new(WidgetKind::TickerTape, &Symbol::default(), &settings());
        assert!(widget.config_json.contains("S\\u0026P 500 Index"));
        let config: Value = serde_json::from_str(&widget.config_json).unwrap();
        assert_eq!(config["symbols"][0]["title"], "S&P 500 Index");
    }

    #[test]
    fn script_breakout_is_neutralized() {
        let hostile = Symbol::new("</script><script>alert(1)</script>");
        let widget = Widget::new(WidgetKind::SymbolInfo, &hostile, &settings());
        assert!(!widget.config_json.contains("</script>"));
        assert!(!widget.config_json.contains('<'));
        let config: Value = serde_json::from_str(&widget.config_json).unwrap();
        assert_eq!(config["symbol"], hostile.as_str());
    }

    #[test]
    fn line_separators_are_escaped() {
        let value = json!({ "s": "a\u{2028}b\u{2029}c" });
        let out = script_safe_json(&value);
        assert_eq!(out, "{\"s\":\"a\\u2028b\\u2029c\"}");
    }

    #[test]
    fn theme_parse() {
        assert_eq!(Theme::parse("Dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(" light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
