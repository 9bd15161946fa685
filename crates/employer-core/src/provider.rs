//! Provider traits for the external services.
//!
//! This module defines the seams between the pipeline and the outside world:
//!
//! - [`Provider`] - Base trait for all providers
//! - [`RankingSource`] - Raw company names from one ranking page
//! - [`SymbolSearch`] - Ticker candidates for a free-text company name
//! - [`QuoteSource`] - Financial metrics for a ticker
//! - [`ReportSink`] - Persistence of the finished report

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    report::Report,
    types::{QuoteSnapshot, SearchCandidate, Source, Symbol},
};

/// Base trait for all providers.
pub trait Provider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// A ranking page that yields raw company names.
///
/// Implementations filter their site's noise (bylines, navigation labels,
/// numerals, overlong strings) before returning.
#[async_trait]
pub trait RankingSource: Provider {
    /// The ranking this source represents.
    fn source(&self) -> Source;

    /// Fetches and parses the ranking page into raw names, in page order.
    async fn fetch_names(&self) -> Result<Vec<String>>;
}

/// Lookup service mapping a free-text name onto ticker candidates.
#[async_trait]
pub trait SymbolSearch: Provider {
    /// Issues one lookup query and returns every candidate, in provider order.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;
}

/// Metrics service for a single ticker.
#[async_trait]
pub trait QuoteSource: Provider {
    /// Issues one metrics query for the ticker.
    async fn quote(&self, symbol: &Symbol) -> Result<QuoteSnapshot>;
}

/// Destination for the assembled report.
pub trait ReportSink: Send + Sync + Debug {
    /// Persists every sheet of the report.
    fn write(&self, report: &Report) -> Result<()>;
}
