//! Candidate selection for a query against a snapshot.

use super::index::IndexSnapshot;
use super::scoring::match_tier;
use super::tokenize::normalize_text;
use crate::record::SymbolRecord;

/// Returns every record matching `query`, in snapshot order.
///
/// A record matches when its search key contains the normalized query, or
/// when the query spells out successive segment initials of its label
/// (`"gcd"` → `GradientCornerDetector`). An empty or whitespace-only query
/// matches nothing.
pub fn match_query<'a>(snapshot: &'a IndexSnapshot, query: &str) -> Vec<&'a SymbolRecord> {
    let normalized = normalize_text(query);
    if normalized.is_empty() {
        return vec![];
    }

    snapshot
        .iter()
        .filter(|record| match_tier(record, &normalized).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawEntry;
    use assert2::check;
    use rstest::rstest;

    fn snapshot() -> IndexSnapshot {
        IndexSnapshot::from_raw(&[
            RawEntry::labeled("GradientCornerDetector").in_package("imagingbook.common.corners"),
            RawEntry::labeled("GrayscaleEdgeDetector").in_package("imagingbook.common.edges"),
            RawEntry::labeled("Graph").in_package("imagingbook.common.graph"),
            RawEntry::labeled("All Classes").with_target("allclasses-index.html"),
            RawEntry::labeled("getCornerDetector()")
                .in_package("imagingbook.common.corners")
                .owned_by("CornerFactory"),
        ])
    }

    fn labels(records: &[&SymbolRecord]) -> Vec<String> {
        records.iter().map(|r| r.label().to_string()).collect()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_empty_query_matches_nothing(#[case] query: &str) {
        check!(match_query(&snapshot(), query).is_empty());
    }

    #[test]
    fn test_substring_returns_snapshot_order() {
        let snapshot = snapshot();
        let matches = match_query(&snapshot, "gra");
        check!(labels(&matches) == vec!["GradientCornerDetector", "Graph", "GrayscaleEdgeDetector"]);
    }

    #[test]
    fn test_case_insensitive() {
        let snapshot = snapshot();
        check!(labels(&match_query(&snapshot, "GRAPH")) == vec!["Graph"]);
    }

    #[test]
    fn test_camel_case_initials() {
        let snapshot = snapshot();
        let matches = labels(&match_query(&snapshot, "gcd"));
        check!(matches.contains(&"GradientCornerDetector".to_string()));
        check!(!matches.contains(&"Graph".to_string()));
    }

    #[test]
    fn test_initials_run_inside_label() {
        let snapshot = snapshot();
        let matches = labels(&match_query(&snapshot, "ed"));
        check!(matches == vec!["GrayscaleEdgeDetector"]);
    }

    #[test]
    fn test_whitespace_in_query_collapsed() {
        let snapshot = snapshot();
        check!(labels(&match_query(&snapshot, "  all    CLASSES ")) == vec!["All Classes"]);
    }

    #[test]
    fn test_signature_substring() {
        let snapshot = snapshot();
        check!(labels(&match_query(&snapshot, "detector()")) == vec!["getCornerDetector()"]);
    }
}
