//! End-to-end screen: rankings, normalization, enrichment, report.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use employer_core::{
    EnrichedTable, QuoteSource, RankingSource, Report, ReportSink, Result, ScreenConfig, Source,
    SymbolSearch,
};
use tracing::{debug, error, info, warn};

use crate::fetcher::MetricsFetcher;
use crate::normalize::Roster;
use crate::report::assemble_report;
use crate::resolver::TickerResolver;

/// Names each ranking is expected to list.
pub const EXPECTED_RANKING_SIZE: usize = 100;

/// Counts and timings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the report was assembled.
    pub finished_at: DateTime<Utc>,
    /// Normalized Forbes names.
    pub forbes_names: usize,
    /// Normalized Great Place To Work names.
    pub gptw_names: usize,
    /// Names found in both rankings.
    pub common_names: usize,
    /// Companies looked up.
    pub attempted: usize,
    /// Companies that resolved to a ticker.
    pub resolved: usize,
    /// Records fetched without error.
    pub complete: usize,
    /// Records whose fetch exhausted its retries.
    pub partial: usize,
}

impl RunSummary {
    /// Wall-clock run time.
    #[must_use]
    pub fn elapsed(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }

    /// Companies that did not resolve to a ticker.
    #[must_use]
    pub const fn unresolved(&self) -> usize {
        self.attempted.saturating_sub(self.resolved)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct ScreenRun {
    /// Normalized rankings.
    pub roster: Roster,
    /// One record per resolved company, in union order.
    pub table: EnrichedTable,
    /// The three report sheets.
    pub report: Report,
    /// Counts and timings.
    pub summary: RunSummary,
}

#[derive(Debug, Default)]
struct Enrichment {
    table: EnrichedTable,
    attempted: usize,
    resolved: usize,
    complete: usize,
    partial: usize,
}

/// Runs the screen against two ranking sources, a lookup service and a
/// metrics service.
///
/// # Example
///
/// ```rust,ignore
/// use employer::{Screener, ScreenConfig, XlsxReportWriter};
///
/// let config = ScreenConfig::default();
/// let screener = Screener::from_config(config.clone())?;
/// let run = screener.run().await?;
/// screener.export(&run, &XlsxReportWriter::new(&config.output_path))?;
/// ```
#[derive(Debug)]
pub struct Screener {
    forbes: Arc<dyn RankingSource>,
    gptw: Arc<dyn RankingSource>,
    resolver: TickerResolver,
    fetcher: MetricsFetcher,
    config: ScreenConfig,
}

impl Screener {
    /// Create a screener from explicit providers.
    #[must_use]
    pub fn new(
        config: ScreenConfig,
        forbes: Arc<dyn RankingSource>,
        gptw: Arc<dyn RankingSource>,
        search: Arc<dyn SymbolSearch>,
        quotes: Arc<dyn QuoteSource>,
    ) -> Self {
        debug!(
            forbes = forbes.name(),
            gptw = gptw.name(),
            search = search.name(),
            quotes = quotes.name(),
            "Configuring screener"
        );
        Self {
            forbes,
            gptw,
            resolver: TickerResolver::new(search, config.lookup_delay),
            fetcher: MetricsFetcher::new(quotes, config.fetch),
            config,
        }
    }

    /// Create a screener over the live ranking pages and Yahoo Finance.
    #[cfg(all(feature = "yahoo", feature = "rankings"))]
    pub fn from_config(config: ScreenConfig) -> Result<Self> {
        use employer_rankings::{ForbesSource, GreatPlaceToWorkSource};
        use employer_yahoo::YahooProvider;

        config.validate()?;
        let forbes = Arc::new(ForbesSource::from_config(&config)?);
        let gptw = Arc::new(GreatPlaceToWorkSource::from_config(&config)?);
        let yahoo = Arc::new(YahooProvider::from_config(&config)?);
        Ok(Self::new(config, forbes, gptw, yahoo.clone(), yahoo))
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// A ranking that fails to load contributes no names.
    async fn fetch_names(&self, source: &dyn RankingSource) -> Vec<String> {
        info!(source = source.name(), "Fetching ranking");
        match source.fetch_names().await {
            Ok(names) => {
                info!(source = source.name(), count = names.len(), "Fetched ranking");
                names
            }
            Err(e) => {
                error!(
                    source = source.name(),
                    error = %e,
                    "Failed to fetch ranking, continuing without it"
                );
                Vec::new()
            }
        }
    }

    /// Fetches and normalizes both rankings.
    pub async fn collect_roster(&self) -> Roster {
        let forbes_raw = self.fetch_names(self.forbes.as_ref()).await;
        self.config.source_delay.pause().await;
        let gptw_raw = self.fetch_names(self.gptw.as_ref()).await;
        self.config.source_delay.pause().await;

        let roster = Roster::new(forbes_raw, gptw_raw, self.config.top_n);

        for source in [Source::Forbes, Source::GreatPlaceToWork] {
            let count = roster.list(source).len();
            if count < EXPECTED_RANKING_SIZE {
                warn!(
                    source = source.label(),
                    count,
                    expected = EXPECTED_RANKING_SIZE,
                    "Fewer ranked companies than expected"
                );
            }
        }
        info!(
            union = roster.union().len(),
            common = roster.common().len(),
            "Normalized rankings"
        );

        roster
    }

    async fn enrich(&self, roster: &Roster) -> Enrichment {
        let names = roster.union();
        let total = names.len();
        let mut enrichment = Enrichment::default();

        for (i, company) in names.iter().enumerate() {
            enrichment.attempted += 1;
            debug!(company = %company, index = i + 1, total, "Processing company");

            match self.resolver.resolve(company).await {
                Some(ticker) => {
                    enrichment.resolved += 1;
                    let record = self.fetcher.fetch(company, &ticker).await;
                    match &record.last_error {
                        None => enrichment.complete += 1,
                        Some(e) => {
                            enrichment.partial += 1;
                            warn!(
                                company = %company,
                                symbol = %ticker,
                                error = %e,
                                "Keeping partial record"
                            );
                        }
                    }
                    enrichment.table.push(record);
                }
                None => info!(company = %company, "No ticker found, skipping"),
            }

            if i + 1 < total {
                self.config.company_delay.pause().await;
            }
        }

        enrichment
    }

    /// Runs the screen up to an assembled report.
    pub async fn run(&self) -> Result<ScreenRun> {
        let started_at = Utc::now();
        info!("Starting employer screen");

        let roster = self.collect_roster().await;
        let enrichment = self.enrich(&roster).await;
        let report = assemble_report(&enrichment.table, &roster)?;

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            forbes_names: roster.list(Source::Forbes).len(),
            gptw_names: roster.list(Source::GreatPlaceToWork).len(),
            common_names: roster.common().len(),
            attempted: enrichment.attempted,
            resolved: enrichment.resolved,
            complete: enrichment.complete,
            partial: enrichment.partial,
        };
        info!(
            attempted = summary.attempted,
            resolved = summary.resolved,
            unresolved = summary.unresolved(),
            complete = summary.complete,
            partial = summary.partial,
            elapsed_secs = summary.elapsed().num_seconds(),
            "Screen finished"
        );

        Ok(ScreenRun {
            roster,
            table: enrichment.table,
            report,
            summary,
        })
    }

    /// Writes the run's report to a sink.
    pub fn export(&self, run: &ScreenRun, sink: &dyn ReportSink) -> Result<()> {
        sink.write(&run.report).inspect_err(|e| {
            error!(error = %e, "Failed to export report");
        })
    }
}
