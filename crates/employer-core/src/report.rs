//! Report sheet types.

use polars::prelude::DataFrame;

/// Display columns of every sheet, in output order.
pub const SHEET_COLUMNS: [&str; 5] = ["Name", "Ticker", "PE Ratio", "Price", "Sector"];

/// One named table of the report.
#[derive(Clone, Debug)]
pub struct Sheet {
    /// Sheet title as shown in the spreadsheet.
    pub title: String,
    /// Rows with the columns in [`SHEET_COLUMNS`].
    pub frame: DataFrame,
}

impl Sheet {
    /// Creates a sheet.
    #[must_use]
    pub fn new(title: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            title: title.into(),
            frame,
        }
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// The finished report: one sheet per source projection.
#[derive(Clone, Debug, Default)]
pub struct Report {
    sheets: Vec<Sheet>,
}

impl Report {
    /// Creates a report from its sheets.
    #[must_use]
    pub const fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Returns the sheets in output order.
    #[must_use]
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Finds a sheet by title.
    #[must_use]
    pub fn sheet(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.title == title)
    }
}
