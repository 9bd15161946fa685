//! Noise filters for extracted names.

use std::fmt;

/// Keywords that mark a Forbes `<strong>` as something other than a company.
pub const FORBES_EXCLUDED_KEYWORDS: [&str; 7] = [
    "contributor",
    "editor",
    "subscribe",
    "photo",
    "watch",
    "video",
    "2025",
];

/// Why an extracted string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Blank after trimming.
    Empty,
    /// At or over the length limit.
    TooLong,
    /// Contains an excluded keyword.
    ExcludedKeyword,
    /// A bare number.
    Numeric,
    /// An author byline.
    Byline,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::TooLong => "too long",
            Self::ExcludedKeyword => "excluded keyword",
            Self::Numeric => "numeric",
            Self::Byline => "starts with 'by '",
        })
    }
}

/// Excluded names reported to the operator per source.
pub const EXCLUSION_PREVIEW: usize = 5;

/// Names kept and rejected by a [`NameFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    /// Number of strings examined.
    pub raw: usize,
    /// Accepted names, in input order.
    pub kept: Vec<String>,
    /// Rejected strings with the reason, in input order.
    pub excluded: Vec<(String, Exclusion)>,
}

impl Filtered {
    /// The first [`EXCLUSION_PREVIEW`] rejected strings with their reasons.
    #[must_use]
    pub fn exclusion_preview(&self) -> &[(String, Exclusion)] {
        &self.excluded[..self.excluded.len().min(EXCLUSION_PREVIEW)]
    }
}

/// Source-specific rules for rejecting non-company strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    /// Strings with this many characters or more are rejected.
    pub length_limit: usize,
    /// Case-insensitive substrings that reject a string.
    pub keywords: Vec<String>,
    /// Reject bare numbers (one decimal point allowed).
    pub reject_numeric: bool,
    /// Reject strings starting with "by ".
    pub reject_bylines: bool,
}

impl NameFilter {
    /// Rules for the Forbes article.
    #[must_use]
    pub fn forbes() -> Self {
        Self {
            length_limit: 60,
            keywords: FORBES_EXCLUDED_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            reject_numeric: true,
            reject_bylines: true,
        }
    }

    /// Rules for the Great Place To Work list.
    #[must_use]
    pub const fn gptw() -> Self {
        Self {
            length_limit: 100,
            keywords: Vec::new(),
            reject_numeric: false,
            reject_bylines: false,
        }
    }

    /// Checks one name, returning the first rule it breaks.
    pub fn check(&self, name: &str) -> Result<(), Exclusion> {
        let lower = name.to_lowercase();

        if name.trim().is_empty() {
            Err(Exclusion::Empty)
        } else if name.chars().count() >= self.length_limit {
            Err(Exclusion::TooLong)
        } else if self.keywords.iter().any(|k| lower.contains(k.as_str())) {
            Err(Exclusion::ExcludedKeyword)
        } else if self.reject_numeric && is_numeric(name) {
            Err(Exclusion::Numeric)
        } else if self.reject_bylines && lower.starts_with("by ") {
            Err(Exclusion::Byline)
        } else {
            Ok(())
        }
    }

    /// Splits names into kept and excluded.
    pub fn apply(&self, names: impl IntoIterator<Item = String>) -> Filtered {
        let mut filtered = Filtered::default();
        for name in names {
            filtered.raw += 1;
            match self.check(&name) {
                Ok(()) => filtered.kept.push(name),
                Err(reason) => filtered.excluded.push((name, reason)),
            }
        }
        filtered
    }
}

/// Digits only, after removing the first `.`.
fn is_numeric(name: &str) -> bool {
    let stripped = name.replacen('.', "", 1);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbes_rules() {
        let filter = NameFilter::forbes();

        assert_eq!(filter.check("Costco Wholesale"), Ok(()));
        assert_eq!(filter.check("   "), Err(Exclusion::Empty));
        assert_eq!(filter.check(&"x".repeat(60)), Err(Exclusion::TooLong));
        assert_eq!(filter.check(&"x".repeat(59)), Ok(()));
        assert_eq!(
            filter.check("Forbes Contributor"),
            Err(Exclusion::ExcludedKeyword)
        );
        assert_eq!(filter.check("Best Employers 2025"), Err(Exclusion::ExcludedKeyword));
        assert_eq!(filter.check("42"), Err(Exclusion::Numeric));
        assert_eq!(filter.check("4.5"), Err(Exclusion::Numeric));
        assert_eq!(filter.check("1.2.3"), Ok(()));
        assert_eq!(filter.check("By Rachel Peachman"), Err(Exclusion::Byline));
        assert_eq!(filter.check("Bytedance"), Ok(()));
    }

    #[test]
    fn test_gptw_rules_are_lenient() {
        let filter = NameFilter::gptw();
        assert_eq!(filter.check("42"), Ok(()));
        assert_eq!(filter.check("Watch Co"), Ok(()));
        assert_eq!(filter.check(""), Err(Exclusion::Empty));
        assert_eq!(filter.check(&"y".repeat(100)), Err(Exclusion::TooLong));
    }

    #[test]
    fn test_apply_keeps_order() {
        let filtered = NameFilter::forbes().apply(
            ["Hilton", "1", "Marriott", "By An Author"]
                .into_iter()
                .map(String::from),
        );

        assert_eq!(filtered.raw, 4);
        assert_eq!(filtered.kept, vec!["Hilton", "Marriott"]);
        assert_eq!(filtered.excluded.len(), 2);
        assert_eq!(filtered.excluded[1].1, Exclusion::Byline);
        assert_eq!(filtered.excluded[1].1.to_string(), "starts with 'by '");
    }

    #[test]
    fn test_exclusion_preview_caps_at_five() {
        let filtered = NameFilter::forbes().apply(
            ["1", "2", "Costco", "3", "By Someone", "Watch this", "4", "5"]
                .into_iter()
                .map(String::from),
        );

        assert_eq!(filtered.excluded.len(), 7);
        let preview = filtered.exclusion_preview();
        assert_eq!(preview.len(), EXCLUSION_PREVIEW);
        assert_eq!(preview[0], ("1".to_string(), Exclusion::Numeric));
        assert_eq!(preview[3], ("By Someone".to_string(), Exclusion::Byline));
        assert_eq!(preview[4].1, Exclusion::ExcludedKeyword);

        let short = NameFilter::gptw().apply(["", "Cisco"].into_iter().map(String::from));
        assert_eq!(short.exclusion_preview(), &[(String::new(), Exclusion::Empty)]);
    }
}
