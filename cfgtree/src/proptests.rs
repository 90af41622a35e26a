//! Property-based tests for key handling, value coercion and persistence.

use crate::key::{canonicalize_key, is_valid_key};
use crate::tree::{ConfigTree, Registration};
use crate::value::{canonicalize_value, Value};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..4).prop_map(|parts| parts.join("."))
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9 #'\":]{0,12}".prop_map(Value::String),
    ]
}

fn comment_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9#':]{1,8}( [a-z0-9\"]{1,8})?[ \t\n]?")
}

fn build(entries: &[(String, Value, Option<String>)]) -> ConfigTree {
    let cfg = ConfigTree::new();
    for (path, value, comment) in entries {
        let mut opts = Registration::new().update(true);
        if let Some(comment) = comment {
            opts = opts.comment(comment.clone());
        }
        // paths through existing leaves conflict; skipping them keeps the rest
        let _ = cfg.register_with(path, value.clone(), opts);
    }
    cfg
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Canonicalization is idempotent
    #[test]
    fn canonicalize_key_idempotent(raw in "[ a-zA-Z0-9_.\t]{0,24}") {
        let once = canonicalize_key(&raw);
        prop_assert_eq!(canonicalize_key(&once), once);
    }

    // Canonical keys never contain whitespace or uppercase letters
    #[test]
    fn canonical_keys_are_normalized(raw in "[ a-zA-Z0-9_.]{0,24}") {
        let key = canonicalize_key(&raw);
        prop_assert!(!key.chars().any(|c| c.is_whitespace() || c.is_uppercase()));
    }

    // Every integer rendering coerces back to the same integer
    #[test]
    fn integers_coerce_to_int(n in any::<i64>()) {
        prop_assert_eq!(canonicalize_value(&n.to_string()), Value::Int(n));
    }

    // Quoted text is returned verbatim and never coerced
    #[test]
    fn quoted_text_stays_string(inner in "[a-z0-9.]{0,10}") {
        let quoted = format!("'{inner}'");
        prop_assert_eq!(canonicalize_value(&quoted), Value::String(inner));
    }

    // A registered path reads back its own value
    #[test]
    fn register_then_get(path in path_strategy(), value in scalar_strategy()) {
        prop_assume!(is_valid_key(&path));
        let cfg = ConfigTree::new();
        cfg.register(&path, value.clone()).unwrap();
        prop_assert_eq!(cfg.get(&path).unwrap(), value);
    }

    // Saving and loading preserves structure and comments
    #[test]
    fn dump_round_trip(
        entries in prop::collection::vec(
            (path_strategy(), scalar_strategy(), comment_strategy()),
            0..12,
        )
    ) {
        let cfg = build(&entries);
        let text = cfg.dump().unwrap();
        let loaded = ConfigTree::from_yaml_str(&text).unwrap();
        prop_assert_eq!(loaded.todict(), cfg.todict());
    }
}
