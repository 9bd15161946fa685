#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/employer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Spreadsheet report writer.
//!
//! [`XlsxReportWriter`] writes each [`Sheet`] of a [`Report`] as one worksheet.
//! String columns become text cells, numeric columns become number cells, and
//! null values are left blank.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use employer_core::{Report, ReportSink, Result, ScreenError, Sheet};
use polars::prelude::{DataType, Series};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

fn export_error(e: impl Display) -> ScreenError {
    ScreenError::Export(e.to_string())
}

/// Writes reports to a single `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxReportWriter {
    path: PathBuf,
}

impl XlsxReportWriter {
    /// Create a writer targeting the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for XlsxReportWriter {
    fn write(&self, report: &Report) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        for sheet in report.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(sheet_name(&sheet.title))
                .map_err(export_error)?;
            write_sheet(worksheet, sheet, &header)?;
            debug!(sheet = %sheet.title, rows = sheet.height(), "Wrote worksheet");
        }

        workbook.save(&self.path).map_err(export_error)?;

        info!(
            path = %self.path.display(),
            sheets = report.sheets().len(),
            "Exported report"
        );
        Ok(())
    }
}

/// Excel rejects `[]:*?/\` in sheet names and names over 31 characters.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header: &Format) -> Result<()> {
    for (index, column) in sheet.frame.get_columns().iter().enumerate() {
        let col = u16::try_from(index).map_err(export_error)?;
        worksheet
            .write_string_with_format(0, col, column.name().as_str(), header)
            .map_err(export_error)?;
        write_column(worksheet, col, column.as_materialized_series())?;
    }
    worksheet.autofit();
    Ok(())
}

fn write_column(worksheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    match series.dtype() {
        DataType::Float64 => {
            for (i, value) in series.f64().map_err(export_error)?.into_iter().enumerate() {
                if let Some(v) = value {
                    worksheet
                        .write_number(data_row(i)?, col, v)
                        .map_err(export_error)?;
                }
            }
        }
        DataType::String => write_strings(worksheet, col, series)?,
        _ => {
            let as_text = series.cast(&DataType::String).map_err(export_error)?;
            write_strings(worksheet, col, &as_text)?;
        }
    }
    Ok(())
}

fn write_strings(worksheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    for (i, value) in series.str().map_err(export_error)?.into_iter().enumerate() {
        if let Some(s) = value {
            worksheet
                .write_string(data_row(i)?, col, s)
                .map_err(export_error)?;
        }
    }
    Ok(())
}

/// Worksheet row for the i-th data value; row 0 holds the header.
fn data_row(i: usize) -> Result<u32> {
    u32::try_from(i + 1).map_err(export_error)
}
