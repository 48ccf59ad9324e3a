//! Canonical ordering of methods inside a class.
//!
//! Each method's signature text (decorators included) is ranked by the
//! first rule whose pattern matches; methods are then stably sorted by
//! rank. Custom rules are consulted before the builtin table.

use crate::extraction::MethodSignature;
use once_cell::sync::Lazy;
use regex::Regex;

/// Rank of a method no rule matches.
pub const NORMAL_RANK: f64 = 10.0;

/// A builtin rule: its configuration label, pattern and default rank.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinRule {
    pub label: &'static str,
    pub pattern: &'static str,
    pub rank: f64,
}

/// Evaluated top to bottom; order matters where patterns overlap.
pub const BUILTIN_RULES: [BuiltinRule; 16] = [
    BuiltinRule { label: "init", pattern: r"def __init__", rank: 0.0 },
    BuiltinRule { label: "abstract_property", pattern: r"(?s)@property.+?@abstractmethod", rank: 1.0 },
    BuiltinRule { label: "property", pattern: r"@property", rank: 2.0 },
    BuiltinRule { label: "abstract_private_property", pattern: r"(?s)@property.+?@abstractmethod.+?def _", rank: 3.0 },
    BuiltinRule { label: "private_property", pattern: r"(?s)@property.+?def _", rank: 4.0 },
    BuiltinRule { label: "abstract_dunder", pattern: r"(?s)@abstract.+?def __[^ \n]+__\(", rank: 5.0 },
    BuiltinRule { label: "dunder", pattern: r"def __[a-z0-9_]+?__", rank: 6.0 },
    BuiltinRule { label: "abstract_classmethod", pattern: r"(?s)@classmethod.+?@abstractmethod", rank: 7.0 },
    BuiltinRule { label: "classmethod", pattern: r"@classmethod", rank: 8.0 },
    BuiltinRule { label: "abstract", pattern: r"@abstractmethod", rank: 9.0 },
    BuiltinRule { label: "final", pattern: r"@final", rank: 11.0 },
    BuiltinRule { label: "abstract_static", pattern: r"(?s)@static.+?@abstractmethod", rank: 12.0 },
    BuiltinRule { label: "static", pattern: r"@staticmethod", rank: 13.0 },
    BuiltinRule { label: "abstract_private", pattern: r"(?s)@abstractmethod.+?def _", rank: 14.0 },
    BuiltinRule { label: "private", pattern: r"def _[^_]", rank: 15.0 },
    BuiltinRule { label: "mangled", pattern: r"(?s)def __[^ ]+[^_].\(", rank: 16.0 },
];

static BUILTIN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BUILTIN_RULES
        .iter()
        .map(|rule| Regex::new(rule.pattern).unwrap())
        .collect()
});

/// A compiled pattern with the rank it assigns.
#[derive(Debug, Clone)]
pub struct OrderingRule {
    pub pattern: Regex,
    pub rank: f64,
    /// Builtin label, `None` for custom rules
    pub label: Option<&'static str>,
}

impl OrderingRule {
    pub fn custom(pattern: Regex, rank: f64) -> Self {
        Self {
            pattern,
            rank,
            label: None,
        }
    }
}

/// The builtin table with optional per-label rank overrides. A label
/// without an override keeps its default rank.
pub fn builtin_rules<F>(mut rank_override: F) -> Vec<OrderingRule>
where
    F: FnMut(&str) -> Option<f64>,
{
    BUILTIN_RULES
        .iter()
        .zip(BUILTIN_PATTERNS.iter())
        .map(|(rule, pattern)| OrderingRule {
            pattern: pattern.clone(),
            rank: rank_override(rule.label).unwrap_or(rule.rank),
            label: Some(rule.label),
        })
        .collect()
}

/// Full rule list and fallback rank used by the method-order check.
#[derive(Debug, Clone)]
pub struct MethodOrdering {
    pub rules: Vec<OrderingRule>,
    pub normal: f64,
}

impl Default for MethodOrdering {
    fn default() -> Self {
        Self {
            rules: builtin_rules(|_| None),
            normal: NORMAL_RANK,
        }
    }
}

impl MethodOrdering {
    /// Custom rules take precedence over builtins.
    pub fn new(custom: Vec<OrderingRule>, builtins: Vec<OrderingRule>, normal: f64) -> Self {
        let mut rules = custom;
        rules.extend(builtins);
        Self { rules, normal }
    }

    pub fn rank(&self, method_text: &str) -> f64 {
        rank(method_text, &self.rules, self.normal)
    }

    pub fn classify(&self, signatures: &[MethodSignature]) -> Vec<String> {
        classify(signatures, &self.rules, self.normal)
    }
}

/// Rank of the first matching rule, else `default_rank`.
pub fn rank(method_text: &str, rules: &[OrderingRule], default_rank: f64) -> f64 {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(method_text))
        .map_or(default_rank, |rule| rule.rank)
}

/// Method names in canonical order; equal ranks keep declaration order.
pub fn classify(
    signatures: &[MethodSignature],
    rules: &[OrderingRule],
    default_rank: f64,
) -> Vec<String> {
    let mut ranked: Vec<(f64, &str)> = signatures
        .iter()
        .map(|sig| (rank(&sig.text, rules, default_rank), sig.name.as_str()))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, name)| name.to_string()).collect()
}
