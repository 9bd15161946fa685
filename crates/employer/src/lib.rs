#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/employer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Best-employer stock screen.
//!
//! Collects two "best employer" rankings, normalizes the company names,
//! resolves each company to an equity ticker, fetches a small set of market
//! metrics per ticker and assembles a three-sheet report. The [`Screener`]
//! drives the whole run; the pieces are usable on their own.
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance lookup and metrics provider
//! - `rankings` - Forbes and Great Place To Work ranking sources
//! - `xlsx` - spreadsheet report writer
//! - `cli` - the `employer-screen` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use employer::{ScreenConfig, Screener, Strategy, XlsxReportWriter};
//!
//! #[tokio::main]
//! async fn main() -> employer::Result<()> {
//!     let config = ScreenConfig::default();
//!     let screener = Screener::from_config(config.clone())?;
//!
//!     let run = screener.run().await?;
//!     for record in Strategy::Defensive.select(&run.table) {
//!         println!("{} {:?}", record.ticker, record.pe_ratio);
//!     }
//!
//!     screener.export(&run, &XlsxReportWriter::new(&config.output_path))
//! }
//! ```

// Core types and traits
pub use employer_core::*;

// Providers
#[cfg(feature = "rankings")]
pub use employer_rankings::{ForbesSource, GreatPlaceToWorkSource, NameFilter};
#[cfg(feature = "xlsx")]
pub use employer_xlsx::XlsxReportWriter;
#[cfg(feature = "yahoo")]
pub use employer_yahoo::YahooProvider;

pub mod fetcher;
pub mod frame;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod strategy;

pub use fetcher::MetricsFetcher;
pub use frame::{Field, records_frame};
pub use normalize::{Roster, normalize_list};
pub use pipeline::{RunSummary, ScreenRun, Screener};
pub use report::assemble_report;
pub use resolver::TickerResolver;
pub use strategy::{Selection, Strategy, UnknownStrategy, filter_by_strategy};
