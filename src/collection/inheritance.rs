//! Propagation of method names from superclasses to subclasses.
//!
//! Classes are looked up by bare name in an arena index; when two collected
//! classes share a name, the first one collected wins. Propagation is
//! bounded rather than computed to a fixed point, so inheritance cycles
//! terminate without being detected.

use super::SourceClass;
use crate::core::deduplicate_ordered;
use std::collections::HashMap;

/// Number of propagation rounds. Two rounds reach grandparents.
pub const INHERITANCE_ROUNDS: usize = 2;

/// Effective method names per class, index-aligned with `classes`.
///
/// Each round reads only the previous round's results: own names first,
/// then the names of every known superclass in header order.
pub fn resolve_inherited_methods(classes: &[SourceClass]) -> Vec<Vec<String>> {
    let index = build_index(classes);
    let parents: Vec<Vec<usize>> = classes
        .iter()
        .map(|class| {
            class
                .superclasses
                .iter()
                .filter_map(|name| index.get(name.as_str()).copied())
                .collect()
        })
        .collect();

    let mut effective: Vec<Vec<String>> = classes.iter().map(|c| c.methods.clone()).collect();

    for _ in 0..INHERITANCE_ROUNDS {
        effective = parents
            .iter()
            .enumerate()
            .map(|(i, parent_ids)| {
                let inherited = parent_ids.iter().flat_map(|&p| effective[p].iter());
                deduplicate_ordered(effective[i].iter().chain(inherited).cloned())
            })
            .collect();
    }

    effective
}

fn build_index(classes: &[SourceClass]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(classes.len());
    for (i, class) in classes.iter().enumerate() {
        index.entry(class.name.as_str()).or_insert(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(name: &str, methods: &[&str], bases: &[&str]) -> SourceClass {
        SourceClass::new("pkg/mod.py", 0, name)
            .with_methods(methods.iter().map(|m| (m.to_string(), format!("def {m}(self)"))))
            .with_superclasses(bases.iter().map(|b| b.to_string()))
    }

    #[test]
    fn test_three_level_chain_reaches_grandparent() {
        let classes = vec![
            class("A", &["a"], &[]),
            class("B", &["b"], &["A"]),
            class("C", &["c"], &["B"]),
        ];
        let resolved = resolve_inherited_methods(&classes);
        assert_eq!(resolved[0], vec!["a"]);
        assert_eq!(resolved[1], vec!["b", "a"]);
        assert_eq!(resolved[2], vec!["c", "b", "a"]);
    }

    #[test]
    fn test_depth_is_bounded() {
        let classes = vec![
            class("A", &["a"], &[]),
            class("B", &["b"], &["A"]),
            class("C", &["c"], &["B"]),
            class("D", &["d"], &["C"]),
        ];
        let resolved = resolve_inherited_methods(&classes);
        assert_eq!(resolved[3], vec!["d", "c", "b"]);
    }

    #[test]
    fn test_multiple_bases_in_header_order() {
        let classes = vec![
            class("Left", &["left", "shared"], &[]),
            class("Right", &["right", "shared"], &[]),
            class("Both", &["own", "shared"], &["Left", "Right"]),
        ];
        let resolved = resolve_inherited_methods(&classes);
        assert_eq!(resolved[2], vec!["own", "shared", "left", "right"]);
    }

    #[test]
    fn test_unknown_superclass_contributes_nothing() {
        let classes = vec![class("Model", &["save"], &["BaseModel", "Generic"])];
        assert_eq!(resolve_inherited_methods(&classes)[0], vec!["save"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let classes = vec![class("A", &["a"], &["B"]), class("B", &["b"], &["A"])];
        let resolved = resolve_inherited_methods(&classes);
        assert_eq!(resolved[0], vec!["a", "b"]);
        assert_eq!(resolved[1], vec!["b", "a"]);
    }

    #[test]
    fn test_first_class_with_a_name_wins() {
        let classes = vec![
            class("Base", &["first"], &[]),
            class("Base", &["second"], &[]),
            class("Child", &[], &["Base"]),
        ];
        assert_eq!(resolve_inherited_methods(&classes)[2], vec!["first"]);
    }
}
