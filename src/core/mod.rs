//! Core data model shared by extraction, mapping and analysis.

pub mod errors;
pub mod identifier;

pub use errors::{Error, Result};
pub use identifier::{
    format_identifier, is_dunder, path_to_wire, sort_on_path, strip_ordinal, ParsedIdentifier,
    QualifiedName, ORDINAL_WIDTH,
};

/// Drop repeated strings, keeping the first occurrence of each.
pub fn deduplicate_ordered<I, S>(strings: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = std::collections::HashSet::new();
    strings
        .into_iter()
        .map(Into::into)
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicate_ordered() {
        assert_eq!(
            deduplicate_ordered(["b", "a", "b", "c", "a"]),
            vec!["b", "a", "c"]
        );
        assert!(deduplicate_ordered(Vec::<String>::new()).is_empty());
    }
}
