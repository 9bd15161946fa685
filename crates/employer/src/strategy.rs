//! Sector and valuation heuristics over the enriched table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use employer_core::{EnrichedTable, FinancialRecord, Result};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::warn;

use crate::frame::{PREVIEW_FIELDS, records_frame};

/// Rows shown per strategy in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// A named screening heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Stable sectors at a modest valuation, cheapest first.
    Defensive,
    /// Economically sensitive sectors, largest first.
    Cyclical,
    /// Growth sectors at a rich valuation, richest first.
    Growth,
}

/// A strategy name that matched none of the known strategies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl Strategy {
    /// Every strategy, in preview order.
    pub const ALL: [Self; 3] = [Self::Defensive, Self::Cyclical, Self::Growth];

    /// Strategy name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Defensive => "Defensive",
            Self::Cyclical => "Cyclical",
            Self::Growth => "Growth",
        }
    }

    /// Sectors the strategy accepts.
    #[must_use]
    pub const fn sectors(&self) -> &'static [&'static str] {
        match self {
            Self::Defensive => &[
                "Healthcare",
                "Utilities",
                "Consumer Defensive",
                "Communication Services",
            ],
            Self::Cyclical => &[
                "Industrials",
                "Consumer Cyclical",
                "Financial Services",
                "Real Estate",
                "Basic Materials",
            ],
            Self::Growth => &[
                "Technology",
                "Communication Services",
                "Healthcare",
                "Industrials",
            ],
        }
    }

    /// The value the strategy filters and sorts on, if the record has it.
    fn key(&self, record: &FinancialRecord) -> Option<f64> {
        match self {
            Self::Defensive | Self::Growth => record.pe_ratio,
            Self::Cyclical => record.market_cap,
        }
    }

    /// Returns true if the record's sector and key value satisfy the strategy.
    #[must_use]
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        let in_sector = record
            .sector
            .as_deref()
            .is_some_and(|s| self.sectors().contains(&s));
        if !in_sector {
            return false;
        }
        match (self, self.key(record)) {
            (_, None) => false,
            (Self::Defensive, Some(pe)) => pe < 20.0,
            (Self::Growth, Some(pe)) => pe > 25.0,
            (Self::Cyclical, Some(_)) => true,
        }
    }

    fn compare(&self, a: &FinancialRecord, b: &FinancialRecord) -> Ordering {
        // Only called on matched records, which always carry a key.
        let a = self.key(a).unwrap_or_default();
        let b = self.key(b).unwrap_or_default();
        match self {
            Self::Defensive => a.total_cmp(&b),
            Self::Cyclical | Self::Growth => b.total_cmp(&a),
        }
    }

    /// Matching records in strategy order. Ties keep table order.
    #[must_use]
    pub fn select<'a>(&self, table: &'a EnrichedTable) -> Vec<&'a FinancialRecord> {
        let mut selected: Vec<_> = table.iter().filter(|r| self.matches(r)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Records chosen by a strategy name.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// Selected records, in strategy order.
    pub records: Vec<&'a FinancialRecord>,
    /// Set when the name was not recognised and the table was returned as is.
    pub warning: Option<UnknownStrategy>,
}

/// Applies the strategy called `name`.
///
/// An unknown name is not an error: the whole table comes back unchanged and
/// [`Selection::warning`] says why.
#[must_use]
pub fn filter_by_strategy<'a>(table: &'a EnrichedTable, name: &str) -> Selection<'a> {
    match name.parse::<Strategy>() {
        Ok(strategy) => Selection {
            records: strategy.select(table),
            warning: None,
        },
        Err(unknown) => {
            warn!(strategy = %unknown.0, "Unknown strategy, returning table unchanged");
            Selection {
                records: table.iter().collect(),
                warning: Some(unknown),
            }
        }
    }
}

/// The top rows of a strategy as a preview frame.
pub fn preview(strategy: Strategy, table: &EnrichedTable) -> Result<DataFrame> {
    let selected = strategy.select(table);
    let top = &selected[..selected.len().min(PREVIEW_ROWS)];
    records_frame(top, &PREVIEW_FIELDS)
}
