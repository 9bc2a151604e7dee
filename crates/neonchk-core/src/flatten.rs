//! # Flattening
//!
//! Turns a nested tree into `dotted.key => leaf` entries for strict-scalar
//! validation. Mapping keys and sequence indices both become segments, so
//! `{db: {hosts: [a, b]}}` flattens to `db.hosts.0` and `db.hosts.1`.
//!
//! Primitive leaves (string, number, boolean, null) are scalar. Entities and
//! date/time values are the non-scalar leaves the strict mode reports.

use neonchk_neon::Value;

/// One leaf of a flattened tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Dot-joined path; empty for a scalar document root.
    pub key: String,
    /// The leaf itself.
    pub value: Value,
    /// Whether the leaf is a primitive scalar.
    pub scalar: bool,
}

/// Flatten `tree` in mapping insertion order.
///
/// Empty mappings and sequences contribute no entries.
pub fn flatten(tree: &Value) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    flatten_into(tree, "", &mut out);
    out
}

/// Entries whose leaf is not a primitive scalar.
pub fn non_scalar_entries(tree: &Value) -> Vec<FlatEntry> {
    flatten(tree).into_iter().filter(|e| !e.scalar).collect()
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Vec<FlatEntry>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map.iter() {
                flatten_into(child, &join(prefix, key), out);
            }
        }
        Value::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join(prefix, &index.to_string()), out);
            }
        }
        leaf => out.push(FlatEntry {
            key: prefix.to_string(),
            value: leaf.clone(),
            scalar: leaf.is_scalar(),
        }),
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonchk_neon::{decode, Mapping};
    use proptest::prelude::*;

    fn keys(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn nested_mappings_and_sequences() {
        let tree = decode("db:\n    host: localhost\n    ports: [1, 2]\ndebug: yes\n").unwrap();
        let entries = flatten(&tree);
        assert_eq!(keys(&entries), ["db.host", "db.ports.0", "db.ports.1", "debug"]);
        assert!(entries.iter().all(|e| e.scalar));
        assert_eq!(entries[2].value, Value::from(2));
    }

    #[test]
    fn scalar_root_is_single_entry_with_empty_key() {
        let entries = flatten(&Value::from(5));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "");
        assert!(entries[0].scalar);
    }

    #[test]
    fn null_is_scalar() {
        let tree = decode("a:\nb: null\n").unwrap();
        assert!(non_scalar_entries(&tree).is_empty());
        assert_eq!(flatten(&tree).len(), 2);
    }

    #[test]
    fn entities_and_datetimes_are_not_scalar() {
        let tree = decode("service: Foo(bar)\nsince: 2020-01-01\nname: x\n").unwrap();
        let bad = non_scalar_entries(&tree);
        assert_eq!(keys(&bad), ["service", "since"]);
    }

    #[test]
    fn empty_collections_produce_nothing() {
        let tree = decode("a: {}\nb: []\n").unwrap();
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn entity_arguments_are_not_descended_into() {
        let tree = decode("x: Foo(a: 1, b: 2)").unwrap();
        let entries = flatten(&tree);
        assert_eq!(keys(&entries), ["x"]);
        assert!(!entries[0].scalar);
    }

    fn arb_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::null()),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z ]{0,5}".prop_map(Value::string),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| Value::Mapping(m.into_iter().collect())),
            ]
        })
    }

    fn as_mapping(entries: &[FlatEntry]) -> Value {
        let map: Mapping = entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect();
        Value::Mapping(map)
    }

    proptest! {
        #[test]
        fn flatten_is_deterministic(t in arb_tree()) {
            prop_assert_eq!(flatten(&t), flatten(&t));
        }

        #[test]
        fn flatten_is_idempotent(
            root in prop::collection::btree_map("[a-d]", arb_tree(), 0..4),
        ) {
            let t = Value::Mapping(root.into_iter().collect());
            let once = flatten(&t);
            let twice = flatten(&as_mapping(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn scalar_only_trees_have_no_violations(t in arb_tree()) {
            prop_assert!(non_scalar_entries(&t).is_empty());
        }
    }
}
