//! HTML templates using Askama.

use askama::Template;

use crate::domain::page::{nav_links, NavLink, Page};
use crate::domain::sentiment::{SentimentResult, SentimentSummary};
use crate::domain::symbol::Symbol;
use crate::domain::widget::{Widget, WidgetSettings};

/// Everything the shared layout needs, plus the page's widgets.
pub struct PageContext {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub symbol: Symbol,
    pub widgets: Vec<Widget>,
    pub nav: Vec<NavLink>,
}

impl PageContext {
    pub fn new(page: Page, symbol: Symbol, settings: &WidgetSettings) -> Self {
        Self {
            slug: page.slug(),
            title: page.title(),
            description: page.description(),
            widgets: page.widgets(&symbol, settings),
            symbol,
            nav: nav_links(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub page: &'a PageContext,
}

#[derive(Template)]
#[template(path = "prediction.html")]
pub struct PredictionTemplate<'a> {
    pub page: &'a PageContext,
}

/// Server-side sentiment over the sample headlines.
pub struct MoodPanel {
    pub summary: SentimentSummary,
    pub headlines: Vec<SentimentResult>,
}

#[derive(Template)]
#[template(path = "news_sentiment.html")]
pub struct NewsSentimentTemplate<'a> {
    pub page: &'a PageContext,
    pub mood: Option<&'a MoodPanel>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub page: &'a PageContext,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
