//! # Tree Matching
//!
//! The two questions a rule asks of a decoded tree:
//!
//! - [`path_exists`]: does a key-path resolve, whatever the value?
//! - [`subtree_matches`]: is a fragment contained in the tree?
//!
//! Containment is asymmetric. Every key of the fragment must be present in
//! the tree at the same place with an equal value; extra keys in the tree
//! are ignored. Leaves compare strictly by type and value, so `1` does not
//! match `1.0` and `true` does not match `"true"`.

use neonchk_neon::{Mapping, Value};

use crate::rules::KeyPath;

/// True iff every segment of `path` resolves through nested mappings.
///
/// The value at the end of the path may be anything, including null or an
/// empty mapping. A sequence or scalar on the way short-circuits to false.
pub fn path_exists(tree: &Value, path: &KeyPath) -> bool {
    let mut node = tree;
    for segment in path.segments() {
        match node.as_mapping().and_then(|map| map.get(segment)) {
            Some(child) => node = child,
            None => return false,
        }
    }
    true
}

/// True iff `fragment` is contained in `tree`.
pub fn subtree_matches(fragment: &Value, tree: &Value) -> bool {
    subtree_diff(fragment, tree).is_none()
}

/// The part of `fragment` not found in `tree`, or `None` when all of it is.
///
/// For a mapping fragment the remainder keeps only the unmatched keys, with
/// nested mappings reduced recursively. A non-mapping fragment is either
/// equal to the whole tree or returned unchanged.
pub fn subtree_diff(fragment: &Value, tree: &Value) -> Option<Value> {
    let Value::Mapping(wanted) = fragment else {
        return (fragment != tree).then(|| fragment.clone());
    };

    let found = tree.as_mapping();
    let mut remainder = Mapping::new();
    for (key, expected) in wanted.iter() {
        let Some(actual) = found.and_then(|map| map.get(key)) else {
            remainder.insert(key, expected.clone());
            continue;
        };
        let missing = match expected {
            Value::Mapping(_) => subtree_diff(expected, actual),
            _ => (expected != actual).then(|| expected.clone()),
        };
        if let Some(missing) = missing {
            remainder.insert(key, missing);
        }
    }

    (!remainder.is_empty()).then_some(Value::Mapping(remainder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{parse_key_rule, parse_value_rule};
    use neonchk_neon::decode;
    use proptest::prelude::*;

    fn tree(src: &str) -> Value {
        decode(src).unwrap()
    }

    fn path(spec: &str) -> KeyPath {
        parse_key_rule(spec).unwrap()
    }

    // -- path_exists ----------------------------------------------------

    #[test]
    fn path_resolves_through_mappings() {
        let t = tree("http:\n    frames: yes\n    headers:\n        x: 1\n");
        assert!(path_exists(&t, &path("http")));
        assert!(path_exists(&t, &path("http:frames")));
        assert!(path_exists(&t, &path("http:headers:x")));
    }

    #[test]
    fn absent_segment_is_false() {
        let t = tree("http:\n    frames: yes\n");
        assert!(!path_exists(&t, &path("http:csp")));
        assert!(!path_exists(&t, &path("mail")));
    }

    #[test]
    fn scalar_intermediate_is_false() {
        let t = tree("http: yes\n");
        assert!(!path_exists(&t, &path("http:frames")));
    }

    #[test]
    fn sequence_intermediate_is_false() {
        let t = tree("list:\n    - a\n    - b\n");
        assert!(!path_exists(&t, &path("list:0")));
    }

    #[test]
    fn null_and_empty_values_still_exist() {
        let t = tree("a:\nb: {}\n");
        assert!(path_exists(&t, &path("a")));
        assert!(path_exists(&t, &path("b")));
    }

    #[test]
    fn scalar_root_has_no_paths() {
        assert!(!path_exists(&Value::from(1), &path("a")));
        assert!(!path_exists(&Value::null(), &path("a")));
    }

    // -- subtree_matches ------------------------------------------------

    #[test]
    fn exact_value_matches() {
        let t = tree("http:\n    frames: yes\n    csp: off\n");
        let rule = parse_value_rule("http:frames:yes").unwrap();
        assert!(subtree_matches(&rule.fragment, &t));
    }

    #[test]
    fn different_leaf_does_not_match() {
        let t = tree("http:\n    frames: no\n");
        let rule = parse_value_rule("http:frames:yes").unwrap();
        assert!(!subtree_matches(&rule.fragment, &t));
    }

    #[test]
    fn leaf_comparison_is_strict() {
        let t = tree("a: 1\nb: 'true'\nc: 1.0\n");
        assert!(!subtree_matches(&Value::single("a", Value::from(1.0)), &t));
        assert!(!subtree_matches(&Value::single("b", Value::from(true)), &t));
        assert!(!subtree_matches(&Value::single("c", Value::from(1)), &t));
        assert!(subtree_matches(&Value::single("a", Value::from(1)), &t));
    }

    #[test]
    fn missing_segment_does_not_match() {
        let t = tree("http:\n    other: yes\n");
        let rule = parse_value_rule("http:frames:yes").unwrap();
        assert!(!subtree_matches(&rule.fragment, &t));
    }

    #[test]
    fn extra_fragment_sibling_does_not_match() {
        let t = tree("http:\n    frames: yes\n");
        let mut inner = Mapping::new();
        inner.insert("frames", Value::from(true));
        inner.insert("csp", Value::from(true));
        let fragment = Value::single("http", Value::Mapping(inner));
        assert!(!subtree_matches(&fragment, &t));
    }

    #[test]
    fn diff_reports_only_the_unmatched_part() {
        let t = tree("http:\n    frames: yes\n");
        let mut inner = Mapping::new();
        inner.insert("frames", Value::from(true));
        inner.insert("csp", Value::from(false));
        let fragment = Value::single("http", Value::Mapping(inner));
        assert_eq!(
            subtree_diff(&fragment, &t),
            Some(Value::single("http", Value::single("csp", Value::from(false))))
        );
    }

    #[test]
    fn non_mapping_fragment_compares_whole_tree() {
        assert!(subtree_matches(&Value::from(3), &Value::from(3)));
        assert!(!subtree_matches(&Value::from(3), &tree("a: 3")));
    }

    #[test]
    fn fragment_against_scalar_tree_does_not_match() {
        let rule = parse_value_rule("a:1").unwrap();
        assert!(!subtree_matches(&rule.fragment, &Value::from(1)));
    }

    // -- properties -----------------------------------------------------

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::null()),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::string),
        ]
    }

    fn arb_tree() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(4, 32, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 1..4)
                .prop_map(|m| Value::Mapping(m.into_iter().collect()))
        })
    }

    /// Every (path, leaf) pair of the tree, leaves being non-mapping values.
    fn leaves(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, Value)>) {
        match value {
            Value::Mapping(map) => {
                for (key, child) in map.iter() {
                    prefix.push(key.to_string());
                    leaves(child, prefix, out);
                    prefix.pop();
                }
            }
            leaf if !prefix.is_empty() => out.push((prefix.clone(), leaf.clone())),
            _ => {}
        }
    }

    fn fragment(segments: &[String], leaf: Value) -> Value {
        segments
            .iter()
            .rev()
            .fold(leaf, |inner, key| Value::single(key.clone(), inner))
    }

    proptest! {
        #[test]
        fn every_leaf_path_exists(t in arb_tree()) {
            let mut out = Vec::new();
            leaves(&t, &mut Vec::new(), &mut out);
            for (segments, _) in out {
                let p = KeyPath::new(segments).unwrap();
                prop_assert!(path_exists(&t, &p));
            }
        }

        #[test]
        fn every_leaf_fragment_matches(t in arb_tree()) {
            let mut out = Vec::new();
            leaves(&t, &mut Vec::new(), &mut out);
            for (segments, leaf) in out {
                prop_assert!(subtree_matches(&fragment(&segments, leaf), &t));
            }
        }

        #[test]
        fn changed_leaf_never_matches(t in arb_tree()) {
            let mut out = Vec::new();
            leaves(&t, &mut Vec::new(), &mut out);
            for (segments, _) in out {
                let changed = fragment(&segments, Value::string("CHANGED"));
                prop_assert!(!subtree_matches(&changed, &t));
            }
        }

        #[test]
        fn unknown_key_never_exists(t in arb_tree()) {
            prop_assert!(!path_exists(&t, &KeyPath::new(vec!["zz".into()]).unwrap()));
        }
    }
}
