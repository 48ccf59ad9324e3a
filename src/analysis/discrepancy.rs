//! Set comparison of expected against actual identifiers.
//!
//! All comparisons use the ordinal-stripped form, so a definition that
//! moved within its file is still matched; the ordinal only drives the
//! ordering check on the overlap.

use crate::core::strip_ordinal;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Outcome of comparing an expected identifier list with an actual one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discrepancies {
    /// Expected but absent, in expected order
    pub missing: Vec<String>,
    /// Present but not expected and not allowed, in actual order
    pub unexpected: Vec<String>,
    #[serde(skip)]
    pub overlap: BTreeSet<String>,
}

impl Discrepancies {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Diff `expected` against `actual`.
///
/// Entries of `actual` matching `allow_additional` are never reported as
/// unexpected.
pub fn analyze_discrepancies(
    expected: &[String],
    actual: &[String],
    allow_additional: Option<&Regex>,
) -> Discrepancies {
    let expected: Vec<String> = expected.iter().map(|s| strip_ordinal(s)).collect();
    let actual: Vec<String> = actual.iter().map(|s| strip_ordinal(s)).collect();
    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();

    let missing = expected
        .iter()
        .filter(|id| !actual_set.contains(id.as_str()))
        .cloned()
        .collect();
    let unexpected = actual
        .iter()
        .filter(|id| !expected_set.contains(id.as_str()))
        .filter(|id| !allow_additional.is_some_and(|allow| allow.is_match(id)))
        .cloned()
        .collect();
    let overlap = actual_set
        .intersection(&expected_set)
        .map(|s| s.to_string())
        .collect();

    Discrepancies {
        missing,
        unexpected,
        overlap,
    }
}

/// One row of an ordering comparison: what the actual tree has at a
/// position, and what the expected order puts there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderingPair {
    pub actual: String,
    pub expected: String,
}

impl OrderingPair {
    pub fn in_place(&self) -> bool {
        self.actual == self.expected
    }
}

/// Positional comparison of both lists restricted to `overlap`.
///
/// Returns nothing when the restricted sequences agree; otherwise every
/// aligned pair, so the report can show context around the mismatches.
pub fn ordering_mismatches(
    expected: &[String],
    actual: &[String],
    overlap: &BTreeSet<String>,
) -> Vec<OrderingPair> {
    let restrict = |ids: &[String]| -> Vec<String> {
        ids.iter()
            .map(|s| strip_ordinal(s))
            .filter(|s| overlap.contains(s))
            .collect()
    };
    let expected = restrict(expected);
    let actual = restrict(actual);

    if expected == actual {
        return Vec::new();
    }

    actual
        .into_iter()
        .zip(expected)
        .map(|(actual, expected)| OrderingPair { actual, expected })
        .collect()
}
