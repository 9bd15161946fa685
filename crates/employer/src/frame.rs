//! Conversion of financial records into polars DataFrames.

use employer_core::{FinancialRecord, Result, ScreenError};
use polars::prelude::{Column, DataFrame};

/// A record field that can be rendered as a DataFrame column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Display name reported by the metrics provider.
    Name,
    /// Ticker symbol.
    Ticker,
    /// Trailing price-to-earnings ratio.
    PeRatio,
    /// Last price.
    Price,
    /// Sector label.
    Sector,
}

/// Report sheet columns, in output order.
pub const REPORT_FIELDS: [Field; 5] = [
    Field::Name,
    Field::Ticker,
    Field::PeRatio,
    Field::Price,
    Field::Sector,
];

/// Strategy preview columns, in output order.
pub const PREVIEW_FIELDS: [Field; 5] = [
    Field::Ticker,
    Field::Name,
    Field::Sector,
    Field::Price,
    Field::PeRatio,
];

impl Field {
    /// Column header.
    #[must_use]
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Ticker => "Ticker",
            Self::PeRatio => "PE Ratio",
            Self::Price => "Price",
            Self::Sector => "Sector",
        }
    }

    fn column(&self, records: &[&FinancialRecord]) -> Column {
        let name = self.header().into();
        match self {
            Self::Name => Column::new(name, texts(records, |r| r.name.clone())),
            Self::Ticker => Column::new(name, texts(records, |r| Some(r.ticker.to_string()))),
            Self::Sector => Column::new(name, texts(records, |r| r.sector.clone())),
            Self::PeRatio => Column::new(name, numbers(records, |r| r.pe_ratio)),
            Self::Price => Column::new(name, numbers(records, |r| r.price)),
        }
    }
}

fn texts(
    records: &[&FinancialRecord],
    f: impl Fn(&FinancialRecord) -> Option<String>,
) -> Vec<Option<String>> {
    records.iter().map(|r| f(r)).collect()
}

fn numbers(
    records: &[&FinancialRecord],
    f: impl Fn(&FinancialRecord) -> Option<f64>,
) -> Vec<Option<f64>> {
    records.iter().map(|r| f(r)).collect()
}

/// Builds a DataFrame with one row per record and one column per field.
///
/// Missing values become nulls.
pub fn records_frame(records: &[&FinancialRecord], fields: &[Field]) -> Result<DataFrame> {
    DataFrame::new(fields.iter().map(|f| f.column(records)).collect())
        .map_err(|e| ScreenError::Other(e.to_string()))
}
