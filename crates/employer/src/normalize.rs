//! Name normalization and cross-source membership.
//!
//! Each ranking's raw names are repaired, deduplicated and capped, then the two
//! lists are combined into a [`Roster`]. Matching across rankings is exact.

use std::collections::HashSet;

use employer_core::{CompanyName, Membership, Source};

/// Fragments produced when a possessive is split off a name, compared case-insensitively.
pub const APOSTROPHE_FRAGMENTS: [&str; 3] = ["s", "'s", "\u{2019}s"];

/// Suffix appended when a fragment is merged back into the preceding name.
pub const POSSESSIVE_SUFFIX: &str = "'s";

fn is_apostrophe_fragment(name: &CompanyName) -> bool {
    let lower = name.as_str().to_lowercase();
    APOSTROPHE_FRAGMENTS.contains(&lower.as_str())
}

/// Merges a name with an apostrophe fragment that immediately follows it.
///
/// Looks exactly one position ahead and consumes at most one fragment per name:
/// `["McDonald", "'s", "Acme"]` becomes `["McDonald's", "Acme"]`.
#[must_use]
pub fn repair_apostrophes(names: Vec<CompanyName>) -> Vec<CompanyName> {
    let mut repaired = Vec::with_capacity(names.len());
    let mut iter = names.into_iter().peekable();

    while let Some(current) = iter.next() {
        if iter.peek().is_some_and(is_apostrophe_fragment) {
            iter.next();
            repaired.push(current.joined_with(POSSESSIVE_SUFFIX));
        } else {
            repaired.push(current);
        }
    }
    repaired
}

/// Removes exact duplicates, keeping the first occurrence.
#[must_use]
pub fn dedup(names: Vec<CompanyName>) -> Vec<CompanyName> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Normalizes one ranking: blank names dropped, apostrophes repaired,
/// duplicates removed, then capped at `limit` names.
#[must_use]
pub fn normalize_list(raw: Vec<String>, limit: Option<usize>) -> Vec<CompanyName> {
    let names = raw.into_iter().filter_map(CompanyName::new).collect();
    let mut names = dedup(repair_apostrophes(names));
    if let Some(limit) = limit {
        names.truncate(limit);
    }
    names
}

/// Both normalized rankings plus their union and intersection.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    forbes: Vec<CompanyName>,
    gptw: Vec<CompanyName>,
    union: Vec<CompanyName>,
    common: Vec<CompanyName>,
    forbes_set: HashSet<CompanyName>,
    gptw_set: HashSet<CompanyName>,
}

impl Roster {
    /// Builds a roster from the raw names of each ranking. `limit` caps each
    /// ranking separately, so common companies come from the capped lists.
    #[must_use]
    pub fn new(forbes_raw: Vec<String>, gptw_raw: Vec<String>, limit: Option<usize>) -> Self {
        Self::from_lists(
            normalize_list(forbes_raw, limit),
            normalize_list(gptw_raw, limit),
        )
    }

    /// Builds a roster from already-normalized lists.
    #[must_use]
    pub fn from_lists(forbes: Vec<CompanyName>, gptw: Vec<CompanyName>) -> Self {
        let forbes_set: HashSet<_> = forbes.iter().cloned().collect();
        let gptw_set: HashSet<_> = gptw.iter().cloned().collect();

        let common = forbes
            .iter()
            .filter(|n| gptw_set.contains(*n))
            .cloned()
            .collect();

        let union = forbes
            .iter()
            .chain(gptw.iter().filter(|n| !forbes_set.contains(*n)))
            .cloned()
            .collect();

        Self {
            forbes,
            gptw,
            union,
            common,
            forbes_set,
            gptw_set,
        }
    }

    /// Names of one ranking, in ranking order.
    #[must_use]
    pub fn list(&self, source: Source) -> &[CompanyName] {
        match source {
            Source::Forbes => &self.forbes,
            Source::GreatPlaceToWork => &self.gptw,
        }
    }

    /// Every distinct name: Forbes order first, then names only in Great Place To Work.
    #[must_use]
    pub fn union(&self) -> &[CompanyName] {
        &self.union
    }

    /// Names present in both rankings, in Forbes order.
    #[must_use]
    pub fn common(&self) -> &[CompanyName] {
        &self.common
    }

    /// Returns true if the name appears in the given ranking.
    #[must_use]
    pub fn contains(&self, source: Source, name: &CompanyName) -> bool {
        match source {
            Source::Forbes => self.forbes_set.contains(name),
            Source::GreatPlaceToWork => self.gptw_set.contains(name),
        }
    }

    /// Rankings the name appears in, or `None` if it appears in neither.
    #[must_use]
    pub fn membership(&self, name: &CompanyName) -> Option<Membership> {
        let membership = Membership {
            forbes: self.forbes_set.contains(name),
            gptw: self.gptw_set.contains(name),
        };
        (membership.forbes || membership.gptw).then_some(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<CompanyName> {
        raw.iter().filter_map(CompanyName::new).collect()
    }

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn as_strs(names: &[CompanyName]) -> Vec<&str> {
        names.iter().map(CompanyName::as_str).collect()
    }

    #[test]
    fn test_repair_merges_fragment() {
        let repaired = repair_apostrophes(names(&["McDonald", "'s", "Acme"]));
        assert_eq!(as_strs(&repaired), vec!["McDonald's", "Acme"]);
    }

    #[test]
    fn test_repair_variants_and_case() {
        let repaired = repair_apostrophes(names(&["Lowe", "\u{2019}S", "Kohl", "s", "Target"]));
        assert_eq!(as_strs(&repaired), vec!["Lowe's", "Kohl's", "Target"]);
    }

    #[test]
    fn test_repair_consumes_one_fragment() {
        let repaired = repair_apostrophes(names(&["A", "s", "s"]));
        assert_eq!(as_strs(&repaired), vec!["A's", "s"]);
    }

    #[test]
    fn test_repair_only_looks_ahead() {
        let repaired = repair_apostrophes(names(&["Acme", "Sales", "'s"]));
        assert_eq!(as_strs(&repaired), vec!["Acme", "Sales's"]);
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let deduped = dedup(names(&["B", "A", "B", "C", "A"]));
        assert_eq!(as_strs(&deduped), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_normalize_list_limit_after_dedup() {
        let normalized = normalize_list(strings(&["A", "A", " ", "B", "C", "D"]), Some(3));
        assert_eq!(as_strs(&normalized), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repaired_duplicates_collapse() {
        let normalized = normalize_list(strings(&["Lowe", "'s", "Lowe's"]), None);
        assert_eq!(as_strs(&normalized), vec!["Lowe's"]);
    }

    #[test]
    fn test_roster_membership() {
        let roster = Roster::new(
            strings(&["Hilton", "Cisco", "McDonald", "'s"]),
            strings(&["Cisco", "Hilton Worldwide", "McDonald's"]),
            None,
        );

        assert_eq!(as_strs(roster.common()), vec!["Cisco", "McDonald's"]);
        assert_eq!(
            as_strs(roster.union()),
            vec!["Hilton", "Cisco", "McDonald's", "Hilton Worldwide"]
        );

        let cisco = CompanyName::new("Cisco").unwrap();
        assert!(roster.membership(&cisco).unwrap().is_both());

        let hilton = CompanyName::new("Hilton").unwrap();
        let membership = roster.membership(&hilton).unwrap();
        assert!(membership.forbes && !membership.gptw);

        assert!(roster.membership(&CompanyName::new("Nobody").unwrap()).is_none());
        assert!(roster.contains(Source::GreatPlaceToWork, &CompanyName::new("Hilton Worldwide").unwrap()));
    }

    #[test]
    fn test_roster_with_empty_source() {
        let roster = Roster::new(strings(&["A", "B"]), Vec::new(), Some(100));
        assert!(roster.common().is_empty());
        assert_eq!(roster.union().len(), 2);
        assert!(roster.list(Source::GreatPlaceToWork).is_empty());
    }

    #[test]
    fn test_roster_caps_both_rankings() {
        let roster = Roster::new(
            strings(&["A", "B", "C", "D"]),
            strings(&["D", "C", "B", "A"]),
            Some(2),
        );
        assert_eq!(as_strs(roster.list(Source::Forbes)), vec!["A", "B"]);
        assert_eq!(as_strs(roster.list(Source::GreatPlaceToWork)), vec!["D", "C"]);
        assert!(roster.common().is_empty());
        assert_eq!(as_strs(roster.union()), vec!["A", "B", "D", "C"]);
    }
}
