#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/employer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the best-employer stock screen.
//!
//! This crate provides the foundational abstractions shared by every other crate:
//!
//! - [`RankingSource`](provider::RankingSource) - Raw company names from a ranking page
//! - [`SymbolSearch`](provider::SymbolSearch) - Free-text lookup of ticker candidates
//! - [`QuoteSource`](provider::QuoteSource) - Financial metrics for a ticker
//! - [`ReportSink`](provider::ReportSink) - Persistence of the finished report
//! - [`attempt_with_backoff`](retry::attempt_with_backoff) - Bounded retries with jittered delays

/// User-agent rotation.
pub mod agent;
/// Run configuration.
pub mod config;
/// Error types for screen operations.
pub mod error;
/// Provider traits for the external services.
pub mod provider;
/// Report sheet types.
pub mod report;
/// Retry and delay primitives.
pub mod retry;
/// Core data types (CompanyName, Symbol, FinancialRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use agent::UserAgentPool;
pub use config::ScreenConfig;
pub use error::{Result, ScreenError};
pub use provider::{Provider, QuoteSource, RankingSource, ReportSink, SymbolSearch};
pub use report::{Report, Sheet, SHEET_COLUMNS};
pub use retry::{BackoffPolicy, DelayRange, Outcome, attempt_with_backoff};
pub use types::{
    CompanyName, EnrichedTable, FinancialRecord, InstrumentType, Membership, QuoteSnapshot,
    SearchCandidate, Source, Symbol,
};
