#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/employer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Best-employer ranking sources.
//!
//! Both sources implement [`RankingSource`](employer_core::RankingSource) and
//! return raw names in page order. Splitting artifacts such as a trailing
//! `'s` fragment are left for the normalizer.

/// Name noise filters.
pub mod filter;
/// Forbes source.
pub mod forbes;
/// Great Place To Work source.
pub mod gptw;
/// Element scanning and text extraction.
pub mod html;
/// Shared page fetching.
pub mod page;

pub use filter::{EXCLUSION_PREVIEW, Exclusion, Filtered, NameFilter};
pub use forbes::{ForbesSource, parse_forbes_page};
pub use gptw::{GreatPlaceToWorkSource, parse_gptw_page};
pub use page::PageFetcher;
