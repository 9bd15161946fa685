//! Great Place To Work "100 Best Companies to Work For" source.

use async_trait::async_trait;
use employer_core::{Provider, RankingSource, Result, ScreenConfig, Source, config::GPTW_URL};
use tracing::info;

use crate::{
    filter::{Filtered, NameFilter},
    html,
    page::PageFetcher,
};

/// Company names on the list page are `<a class="link h5">` elements.
#[must_use]
pub fn parse_gptw_page(page: &str, filter: &NameFilter) -> Filtered {
    let names = html::elements(page, "a")
        .into_iter()
        .filter(|e| e.has_classes(&["link", "h5"]))
        .map(|e| e.text());
    filter.apply(names)
}

/// Ranking source for the Great Place To Work list.
#[derive(Debug)]
pub struct GreatPlaceToWorkSource {
    url: String,
    pages: PageFetcher,
    filter: NameFilter,
}

impl GreatPlaceToWorkSource {
    /// Create a source for the given list URL.
    #[must_use]
    pub fn new(pages: PageFetcher, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pages,
            filter: NameFilter::gptw(),
        }
    }

    /// Create a source from the run configuration.
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Ok(Self::new(
            PageFetcher::from_config(config)?,
            config.gptw_url.clone(),
        ))
    }

    /// Create a source for the 2025 list with default settings.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(PageFetcher::new()?, GPTW_URL))
    }
}

impl Provider for GreatPlaceToWorkSource {
    fn name(&self) -> &str {
        "Great Place To Work"
    }

    fn description(&self) -> &str {
        "Great Place To Work 100 Best Companies to Work For"
    }
}

#[async_trait]
impl RankingSource for GreatPlaceToWorkSource {
    fn source(&self) -> Source {
        Source::GreatPlaceToWork
    }

    async fn fetch_names(&self) -> Result<Vec<String>> {
        let page = self.pages.get_text(&self.url).await?;
        let filtered = parse_gptw_page(&page, &self.filter);

        info!(
            raw = filtered.raw,
            kept = filtered.kept.len(),
            excluded = filtered.excluded.len(),
            "Parsed Great Place To Work company links"
        );
        for (name, reason) in filtered.exclusion_preview() {
            info!(name = %name, reason = %reason, "Excluded Great Place To Work link");
        }

        Ok(filtered.kept)
    }
}
