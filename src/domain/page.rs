//! Page catalogue: what each route shows and with which widgets.

use super::symbol::Symbol;
use super::widget::{Widget, WidgetKind, WidgetSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Prediction,
    NewsSentiment,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Prediction, Page::NewsSentiment, Page::About];

    /// Nav key, also used to mark the active link.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Prediction => "prediction",
            Self::NewsSentiment => "news",
            Self::About => "about",
        }
    }

    /// Canonical path; the router also accepts the aliases in [`Page::paths`].
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Prediction => "/prediction/",
            Self::NewsSentiment => "/news-sentiment/",
            Self::About => "/about/",
        }
    }

    pub fn paths(&self) -> &'static [&'static str] {
        match self {
            Self::Home => &["/"],
            Self::Prediction => &["/prediction", "/prediction/"],
            Self::NewsSentiment => &["/news", "/news/", "/news-sentiment", "/news-sentiment/"],
            Self::About => &["/about", "/about/"],
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            Self::Home => "Dashboard",
            Self::Prediction => "Prediction",
            Self::NewsSentiment => "News & Sentiment",
            Self::About => "About",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Stock Market Analysis Dashboard",
            Self::Prediction => "Stock Market Prediction",
            Self::NewsSentiment => "News & Sentiment Analysis",
            Self::About => "About Stock Market Analysis",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Home => "Professional stock market analysis and news dashboard",
            Self::Prediction => {
                "Advanced stock prediction with performance metrics, seasonals, and technical analysis"
            }
            Self::NewsSentiment => "Real-time financial news and market sentiment analysis",
            Self::About => "Learn about our professional stock market analysis platform",
        }
    }

    pub fn widget_kinds(&self) -> &'static [WidgetKind] {
        match self {
            Self::Home => &[
                WidgetKind::TickerTape,
                WidgetKind::AdvancedChart,
                WidgetKind::SymbolOverview,
                WidgetKind::Timeline,
            ],
            Self::Prediction => &[
                WidgetKind::SymbolInfo,
                WidgetKind::AdvancedChart,
                WidgetKind::SymbolOverview,
                WidgetKind::TechnicalAnalysis,
                WidgetKind::Financials,
            ],
            Self::NewsSentiment => &[
                WidgetKind::TickerTape,
                WidgetKind::Timeline,
                WidgetKind::TechnicalAnalysis,
            ],
            Self::About => &[WidgetKind::TickerTape, WidgetKind::CompanyProfile],
        }
    }

    pub fn widgets(&self, symbol: &Symbol, settings: &WidgetSettings) -> Vec<Widget> {
        self.widget_kinds()
            .iter()
            .map(|kind| Widget::new(*kind, symbol, settings))
            .collect()
    }
}

/// Link in the navigation bar.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub slug: &'static str,
    pub label: &'static str,
    pub path: &'static str,
}

pub fn nav_links() -> Vec<NavLink> {
    Page::ALL
        .iter()
        .map(|p| NavLink {
            slug: p.slug(),
            label: p.nav_label(),
            path: p.path(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_has_distinct_slug_and_path() {
        let mut slugs: Vec<_> = Page::ALL.iter().map(|p| p.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), Page::ALL.len());

        for page in Page::ALL {
            assert!(page.paths().contains(&page.path()));
        }
    }

    #[test]
    fn titles_match_catalogue() {
        assert_eq!(Page::Home.title(), "Stock Market Analysis Dashboard");
        assert_eq!(Page::NewsSentiment.title(), "News & Sentiment Analysis");
    }

    #[test]
    fn prediction_page_has_technical_analysis() {
        assert!(Page::Prediction
            .widget_kinds()
            .contains(&WidgetKind::TechnicalAnalysis));
    }

    #[test]
    fn widgets_follow_kinds() {
        let widgets = Page::Home.widgets(&Symbol::default(), &WidgetSettings::default());
        let kinds: Vec<_> = widgets.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, Page::Home.widget_kinds());
    }

    #[test]
    fn nav_links_cover_all_pages() {
        let links = nav_links();
        assert_eq!(links.len(), 4);
        assert_eq!(links[0].path, "/");
        assert_eq!(links[2].label, "News & Sentiment");
    }
}
