//! Core data types for the employer screen.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`CompanyName`] - Normalized company name from a ranking
//! - [`Source`] and [`Membership`] - Which rankings a company appears in
//! - [`SearchCandidate`] - One candidate returned by a ticker lookup
//! - [`QuoteSnapshot`] - Raw metrics response for a ticker
//! - [`FinancialRecord`] - Enriched record for one company
//! - [`EnrichedTable`] - Ordered collection of records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A company name taken from a ranking.
///
/// Names are trimmed on creation and are never empty. Comparison is exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyName(String);

impl CompanyName {
    /// Creates a company name, returning `None` if the trimmed input is empty.
    #[must_use]
    pub fn new(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a fragment to the name, used when a split name is recombined.
    #[must_use]
    pub fn joined_with(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two rankings the screen ingests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Forbes "America's Best Large Employers".
    Forbes,
    /// Great Place To Work "100 Best Companies to Work For".
    GreatPlaceToWork,
}

impl Source {
    /// Short label used in logs and sheet names.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Forbes => "Forbes",
            Self::GreatPlaceToWork => "GPTW",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of rankings a company appears in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// Present in the Forbes ranking.
    pub forbes: bool,
    /// Present in the Great Place To Work ranking.
    pub gptw: bool,
}

impl Membership {
    /// Returns true if the company appears in the given source.
    #[must_use]
    pub const fn contains(&self, source: Source) -> bool {
        match source {
            Source::Forbes => self.forbes,
            Source::GreatPlaceToWork => self.gptw,
        }
    }

    /// Returns true if the company appears in both rankings.
    #[must_use]
    pub const fn is_both(&self) -> bool {
        self.forbes && self.gptw
    }
}

/// Instrument type tag attached to a lookup candidate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    /// A tradeable stock.
    Equity,
    /// Exchange-traded fund.
    Etf,
    /// Mutual fund.
    MutualFund,
    /// Market index.
    Index,
    /// Anything else, with the provider's raw tag.
    Other(String),
}

impl InstrumentType {
    /// Maps a provider tag (e.g. `"EQUITY"`) onto an instrument type.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "EQUITY" => Self::Equity,
            "ETF" => Self::Etf,
            "MUTUALFUND" => Self::MutualFund,
            "INDEX" => Self::Index,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// Returns true for equities.
    #[must_use]
    pub const fn is_equity(&self) -> bool {
        matches!(self, Self::Equity)
    }
}

/// A single candidate returned by a ticker lookup query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Candidate ticker symbol.
    pub symbol: Symbol,
    /// Instrument type of the candidate.
    pub instrument: InstrumentType,
    /// Display name, if the provider supplied one.
    pub name: Option<String>,
    /// Listing exchange, if the provider supplied one.
    pub exchange: Option<String>,
}

impl SearchCandidate {
    /// Creates a candidate with required fields.
    #[must_use]
    pub const fn new(symbol: Symbol, instrument: InstrumentType) -> Self {
        Self {
            symbol,
            instrument,
            name: None,
            exchange: None,
        }
    }
}

/// Metrics returned by one query for a ticker. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Display name from the data provider.
    pub short_name: Option<String>,
    /// Business sector.
    pub sector: Option<String>,
    /// Industry within the sector.
    pub industry: Option<String>,
    /// Current share price.
    pub price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Trailing price-to-earnings ratio.
    pub trailing_pe: Option<f64>,
}

impl QuoteSnapshot {
    /// Returns true if the display name is present and non-empty.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.short_name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// Enriched financial record for one company with a resolved ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Ticker the record was fetched for.
    pub ticker: Symbol,
    /// Company name from the ranking this record was resolved from.
    pub company: CompanyName,
    /// Display name from the data provider.
    pub name: Option<String>,
    /// Business sector.
    pub sector: Option<String>,
    /// Industry within the sector.
    pub industry: Option<String>,
    /// Current share price.
    pub price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Trailing price-to-earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Error text from the last failed attempt, cleared on success.
    pub last_error: Option<String>,
}

impl FinancialRecord {
    /// Creates an empty record for a ticker.
    #[must_use]
    pub const fn new(ticker: Symbol, company: CompanyName) -> Self {
        Self {
            ticker,
            company,
            name: None,
            sector: None,
            industry: None,
            price: None,
            market_cap: None,
            pe_ratio: None,
            last_error: None,
        }
    }

    /// Copies every field of a snapshot into the record, overwriting the previous values.
    pub fn absorb(&mut self, snapshot: &QuoteSnapshot) {
        self.name = snapshot.short_name.clone().filter(|n| !n.trim().is_empty());
        self.sector = snapshot.sector.clone();
        self.industry = snapshot.industry.clone();
        self.price = snapshot.price;
        self.market_cap = snapshot.market_cap;
        self.pe_ratio = snapshot.trailing_pe;
    }

    /// A record is usable only when the display name is present.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.name.is_some()
    }
}

/// Ordered collection of records, one per company with a resolved ticker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTable {
    records: Vec<FinancialRecord>,
}

impl EnrichedTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: FinancialRecord) {
        self.records.push(record);
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over the records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    /// Finds the record resolved from the given company name.
    #[must_use]
    pub fn find(&self, company: &CompanyName) -> Option<&FinancialRecord> {
        self.records.iter().find(|r| &r.company == company)
    }
}

impl FromIterator<FinancialRecord> for EnrichedTable {
    fn from_iter<I: IntoIterator<Item = FinancialRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EnrichedTable {
    type Item = FinancialRecord;
    type IntoIter = std::vec::IntoIter<FinancialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_uppercased() {
        assert_eq!(Symbol::new(" aapl ").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft").to_string(), "MSFT");
    }

    #[test]
    fn test_company_name_rejects_blank() {
        assert!(CompanyName::new("   ").is_none());
        let name = CompanyName::new("  Acme Corp ").unwrap();
        assert_eq!(name.as_str(), "Acme Corp");
        assert_eq!(name.joined_with("'s").as_str(), "Acme Corp's");
    }

    #[test]
    fn test_instrument_type_from_tag() {
        assert!(InstrumentType::from_tag("EQUITY").is_equity());
        assert!(InstrumentType::from_tag("equity").is_equity());
        assert_eq!(InstrumentType::from_tag("ETF"), InstrumentType::Etf);
        assert_eq!(
            InstrumentType::from_tag("FUTURE"),
            InstrumentType::Other("FUTURE".to_string())
        );
    }

    #[test]
    fn test_absorb_copies_fields_independently() {
        let mut record = FinancialRecord::new(
            Symbol::new("ACME"),
            CompanyName::new("Acme").unwrap(),
        );
        record.absorb(&QuoteSnapshot {
            short_name: Some("Acme Inc.".to_string()),
            sector: Some("Industrials".to_string()),
            ..Default::default()
        });

        assert!(record.is_usable());
        assert_eq!(record.sector.as_deref(), Some("Industrials"));
        assert_eq!(record.pe_ratio, None);
        assert_eq!(record.market_cap, None);
    }

    #[test]
    fn test_blank_short_name_is_not_usable() {
        let snapshot = QuoteSnapshot {
            short_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!snapshot.has_name());

        let mut record = FinancialRecord::new(
            Symbol::new("ACME"),
            CompanyName::new("Acme").unwrap(),
        );
        record.absorb(&snapshot);
        assert!(!record.is_usable());
    }

    #[test]
    fn test_membership() {
        let both = Membership {
            forbes: true,
            gptw: true,
        };
        assert!(both.is_both());
        assert!(both.contains(Source::GreatPlaceToWork));

        let forbes_only = Membership {
            forbes: true,
            gptw: false,
        };
        assert!(!forbes_only.is_both());
        assert!(!forbes_only.contains(Source::GreatPlaceToWork));
    }

    #[test]
    fn test_table_find() {
        let acme = CompanyName::new("Acme").unwrap();
        let table: EnrichedTable = [FinancialRecord::new(Symbol::new("ACME"), acme.clone())]
            .into_iter()
            .collect();

        assert_eq!(table.len(), 1);
        assert_eq!(table.find(&acme).map(|r| r.ticker.as_str()), Some("ACME"));
        assert!(table.find(&CompanyName::new("Other").unwrap()).is_none());
    }
}
