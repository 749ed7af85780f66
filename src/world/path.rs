//! Dotted-property-path mutation over `serde_json::Value` trees.
//!
//! Scripted content addresses entity fields with paths like
//! `"battle_stats.attack"`; intermediate objects are created on demand and a
//! leaf write replaces whatever was there before.

use serde_json::{Map, Value};
use tracing::warn;

/// Write `value` at `path` inside `root`, creating intermediate objects.
/// A segment that lands on a non-object (e.g. a number mid-path) is replaced
/// by an object — scripted content overwrites, it never errors.
pub fn set(root: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        warn!(target: "world", "ignoring property write with an empty path");
        return;
    }
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let map = match current.as_object_mut() {
            Some(map) => map,
            // Unreachable: every branch below leaves an object in `current`.
            None => return,
        };
        if segments.peek().is_none() {
            map.insert(segment.to_owned(), value);
            return;
        }
        let entry = map.entry(segment.to_owned()).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }
}

/// Read the value at `path`, if the full chain exists.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_creates_intermediate_objects() {
        let mut root = Value::Null;
        set(&mut root, "stats.hp.current", json!(34));
        assert_eq!(get(&root, "stats.hp.current"), Some(&json!(34)));
    }

    #[test]
    fn set_overwrites_leaf() {
        let mut root = json!({"flags": {"met_kraden": false}});
        set(&mut root, "flags.met_kraden", json!(true));
        assert_eq!(get(&root, "flags.met_kraden"), Some(&json!(true)));
    }

    #[test]
    fn set_replaces_scalar_mid_path() {
        let mut root = json!({"stats": 3});
        set(&mut root, "stats.hp", json!(10));
        assert_eq!(get(&root, "stats.hp"), Some(&json!(10)));
    }

    #[test]
    fn get_missing_chain_is_none() {
        let root = json!({"a": {"b": 1}});
        assert_eq!(get(&root, "a.c"), None);
        assert_eq!(get(&root, "a.b.c"), None);
    }
}
