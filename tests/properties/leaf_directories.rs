//! Property tests for the leaf directory reducer.

use std::collections::BTreeSet;

use proptest::prelude::*;

use ftp_deploy::{leaf_directories, RelativePath};

fn segment() -> impl Strategy<Value = String> {
    // A tiny alphabet makes shared prefixes (d1 vs d10) likely
    proptest::string::string_regex("[a-c][0-2]{0,2}").unwrap()
}

fn file_path() -> impl Strategy<Value = RelativePath> {
    (proptest::collection::vec(segment(), 0..=4), segment())
        .prop_map(|(dirs, file)| {
            let mut parts = dirs;
            parts.push(format!("{}.js", file));
            RelativePath::new(parts.join("/"))
        })
}

fn paths() -> impl Strategy<Value = Vec<RelativePath>> {
    proptest::collection::vec(file_path(), 0..=24)
}

fn as_set(leaves: &[RelativePath]) -> BTreeSet<String> {
    leaves.iter().map(|p| p.as_str().to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: No leaf is an ancestor of (or equal to) another leaf.
    #[test]
    fn property_no_leaf_contains_another(input in paths()) {
        let leaves = leaf_directories(&input);
        for (i, a) in leaves.iter().enumerate() {
            for (j, b) in leaves.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.contains(b), "{} contains {}", a, b);
                }
            }
        }
    }

    /// PROPERTY: Every non-root parent directory is covered by some leaf.
    #[test]
    fn property_every_parent_is_covered(input in paths()) {
        let leaves = leaf_directories(&input);
        for path in &input {
            if let Some(parent) = path.parent().filter(|p| !p.is_root()) {
                prop_assert!(
                    leaves.iter().any(|leaf| parent.contains(leaf)),
                    "{} not covered by {:?}", parent, leaves
                );
            }
        }
    }

    /// PROPERTY: Every leaf is the parent of some input path.
    #[test]
    fn property_leaves_come_from_input(input in paths()) {
        let parents: BTreeSet<String> = input
            .iter()
            .filter_map(|p| p.parent())
            .map(|p| p.as_str().to_string())
            .collect();
        for leaf in leaf_directories(&input) {
            prop_assert!(parents.contains(leaf.as_str()));
        }
    }

    /// PROPERTY: The set of leaves does not depend on input order.
    #[test]
    fn property_order_independent(input in paths()) {
        let mut reversed = input.clone();
        reversed.reverse();
        let mut sorted = input.clone();
        sorted.sort();

        let expected = as_set(&leaf_directories(&input));
        prop_assert_eq!(as_set(&leaf_directories(&reversed)), expected.clone());
        prop_assert_eq!(as_set(&leaf_directories(&sorted)), expected);
    }

    /// PROPERTY: Adding root-level files never changes the result.
    #[test]
    fn property_root_files_are_ignored(input in paths(), name in segment()) {
        let mut with_root = input.clone();
        with_root.push(RelativePath::new(format!("{}.js", name)));
        prop_assert_eq!(
            as_set(&leaf_directories(&with_root)),
            as_set(&leaf_directories(&input))
        );
    }
}
