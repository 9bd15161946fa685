//! Forbes "America's Best Large Employers" source.

use async_trait::async_trait;
use employer_core::{Provider, RankingSource, Result, ScreenConfig, Source, config::FORBES_URL};
use tracing::info;

use crate::{
    filter::{Filtered, NameFilter},
    html,
    page::PageFetcher,
};

/// Company names on the Forbes article are `<strong data-ga-track>` elements.
#[must_use]
pub fn parse_forbes_page(page: &str, filter: &NameFilter) -> Filtered {
    let names = html::elements(page, "strong")
        .into_iter()
        .filter(|e| e.has_attr("data-ga-track"))
        .map(|e| e.text());
    filter.apply(names)
}

/// Ranking source for the Forbes article.
#[derive(Debug)]
pub struct ForbesSource {
    url: String,
    pages: PageFetcher,
    filter: NameFilter,
}

impl ForbesSource {
    /// Create a source for the given article URL.
    #[must_use]
    pub fn new(pages: PageFetcher, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pages,
            filter: NameFilter::forbes(),
        }
    }

    /// Create a source from the run configuration.
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Ok(Self::new(
            PageFetcher::from_config(config)?,
            config.forbes_url.clone(),
        ))
    }

    /// Create a source for the 2025 article with default settings.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(PageFetcher::new()?, FORBES_URL))
    }
}

impl Provider for ForbesSource {
    fn name(&self) -> &str {
        "Forbes"
    }

    fn description(&self) -> &str {
        "Forbes America's Best Large Employers"
    }
}

#[async_trait]
impl RankingSource for ForbesSource {
    fn source(&self) -> Source {
        Source::Forbes
    }

    async fn fetch_names(&self) -> Result<Vec<String>> {
        let page = self.pages.get_text(&self.url).await?;
        let filtered = parse_forbes_page(&page, &self.filter);

        info!(
            raw = filtered.raw,
            kept = filtered.kept.len(),
            excluded = filtered.excluded.len(),
            "Parsed Forbes <strong> tags"
        );
        for (name, reason) in filtered.exclusion_preview() {
            info!(name = %name, reason = %reason, "Excluded Forbes tag");
        }

        Ok(filtered.kept)
    }
}
