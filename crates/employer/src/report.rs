//! Report assembly: three sheets projected from the enriched table.

use employer_core::{CompanyName, EnrichedTable, FinancialRecord, Report, Result, Sheet, Source};
use tracing::info;

use crate::frame::{REPORT_FIELDS, records_frame};
use crate::normalize::Roster;

/// Sheet holding companies from the Forbes ranking.
pub const FORBES_SHEET: &str = "Forbes Employers";

/// Sheet holding companies from the Great Place To Work ranking.
pub const GPTW_SHEET: &str = "GPTW Employers";

/// Sheet holding companies found in both rankings.
pub const COMMON_SHEET: &str = "Common Employers";

fn project<'a>(
    table: &'a EnrichedTable,
    keep: impl Fn(&CompanyName) -> bool,
) -> Vec<&'a FinancialRecord> {
    table.iter().filter(|r| keep(&r.company)).collect()
}

fn sheet(title: &str, records: &[&FinancialRecord]) -> Result<Sheet> {
    let sheet = Sheet::new(title, records_frame(records, &REPORT_FIELDS)?);
    info!(sheet = title, rows = sheet.height(), "Assembled sheet");
    Ok(sheet)
}

/// Builds the Forbes, Great Place To Work and common sheets.
///
/// Rows follow enrichment order. Companies without a ticker never reached the
/// table and so appear on no sheet.
pub fn assemble_report(table: &EnrichedTable, roster: &Roster) -> Result<Report> {
    let forbes = project(table, |c| roster.contains(Source::Forbes, c));
    let gptw = project(table, |c| roster.contains(Source::GreatPlaceToWork, c));
    let common = project(table, |c| {
        roster.membership(c).is_some_and(|m| m.is_both())
    });

    Ok(Report::new(vec![
        sheet(FORBES_SHEET, &forbes)?,
        sheet(GPTW_SHEET, &gptw)?,
        sheet(COMMON_SHEET, &common)?,
    ]))
}
