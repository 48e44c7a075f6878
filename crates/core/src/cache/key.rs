//! Deterministic cache key generation for filters.
//!
//! Keys must survive process restarts, so they are derived from an explicit
//! canonical encoding of the filter rather than from its `Debug` output.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::filter::Filter;

/// Compute the cache key for `filter` against `collection`.
///
/// Format: `{collection}:{sha256 hex of the canonical filter}`.
pub fn cache_key(collection: &str, filter: &Filter) -> String {
    let mut hasher = Sha256::new();
    hasher.update(collection.as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical_filter(filter).as_bytes());
    format!("{collection}:{}", hex::encode(hasher.finalize()))
}

/// Render a filter in canonical JSON form.
///
/// Object keys are sorted, `and`/`or` clauses are flattened, sorted and
/// de-duplicated, single-clause groups collapse to their clause, and
/// integral floats become integers.
pub fn canonical_filter(filter: &Filter) -> String {
    canonical_value(filter).to_string()
}

fn canonical_value(filter: &Filter) -> Value {
    match filter {
        Filter::Eq { field, value } => {
            let mut inner = Map::new();
            inner.insert("field".into(), Value::String(field.clone()));
            inner.insert("value".into(), normalize(value));
            let mut outer = Map::new();
            outer.insert("eq".into(), Value::Object(inner));
            Value::Object(outer)
        }
        Filter::And(clauses) => group("and", clauses, and_clauses),
        Filter::Or(clauses) => group("or", clauses, or_clauses),
    }
}

fn and_clauses(filter: &Filter) -> Option<&Vec<Filter>> {
    match filter {
        Filter::And(inner) => Some(inner),
        _ => None,
    }
}

fn or_clauses(filter: &Filter) -> Option<&Vec<Filter>> {
    match filter {
        Filter::Or(inner) => Some(inner),
        _ => None,
    }
}

fn group(op: &str, clauses: &[Filter], same_op: fn(&Filter) -> Option<&Vec<Filter>>) -> Value {
    let mut flat = Vec::new();
    flatten(clauses, same_op, &mut flat);

    let mut rendered: Vec<(String, Value)> = flat
        .into_iter()
        .map(|clause| {
            let value = canonical_value(clause);
            (value.to_string(), value)
        })
        .collect();
    rendered.sort_by(|a, b| a.0.cmp(&b.0));
    rendered.dedup_by(|a, b| a.0 == b.0);

    if rendered.len() == 1
        && let Some((_, only)) = rendered.pop()
    {
        return only;
    }

    let mut map = Map::new();
    map.insert(op.to_string(), Value::Array(rendered.into_iter().map(|(_, v)| v).collect()));
    Value::Object(map)
}

fn flatten<'a>(clauses: &'a [Filter], same_op: fn(&Filter) -> Option<&Vec<Filter>>, out: &mut Vec<&'a Filter>) {
    for clause in clauses {
        match same_op(clause) {
            Some(inner) => flatten(inner, same_op, out),
            None => out.push(clause),
        }
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> = map.iter().map(|(k, v)| (k, normalize(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_stability() {
        let key1 = cache_key("results", &Filter::eq("Season", 2));
        let key2 = cache_key("results", &Filter::eq("Season", 2));
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_format() {
        let key = cache_key("results", &Filter::eq("Season", 2));
        let (collection, digest) = key.split_once(':').unwrap();
        assert_eq!(collection, "results");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_differs_by_value_and_field() {
        let base = cache_key("results", &Filter::eq("Season", 2));
        assert_ne!(base, cache_key("results", &Filter::eq("Season", 3)));
        assert_ne!(base, cache_key("results", &Filter::eq("season", 2)));
        assert_ne!(base, cache_key("results", &Filter::eq("Season", "2")));
    }

    #[test]
    fn test_key_differs_by_collection() {
        let filter = Filter::eq("Season", 2);
        assert_ne!(cache_key("results", &filter), cache_key("archive", &filter));
    }

    #[test]
    fn test_clause_order_is_irrelevant() {
        let a = Filter::eq("Season", 2);
        let b = Filter::eq("Fixtures.Special", "Pitch Invasion");
        let forward = Filter::and([a.clone(), b.clone()]);
        let backward = Filter::and([b.clone(), a.clone()]);
        let repeated = Filter::and([a.clone(), b.clone(), a.clone()]);
        let nested = Filter::and([a, Filter::and([b])]);

        let key = cache_key("results", &forward);
        assert_eq!(key, cache_key("results", &backward));
        assert_eq!(key, cache_key("results", &repeated));
        assert_eq!(key, cache_key("results", &nested));
    }

    #[test]
    fn test_and_or_are_distinct() {
        let a = Filter::eq("Season", 1);
        let b = Filter::eq("Season", 2);
        assert_ne!(
            cache_key("results", &Filter::and([a.clone(), b.clone()])),
            cache_key("results", &Filter::or([a, b]))
        );
        assert_ne!(cache_key("results", &Filter::and([])), cache_key("results", &Filter::or([])));
    }

    #[test]
    fn test_single_clause_collapses() {
        let a = Filter::eq("Season", 1);
        assert_eq!(canonical_filter(&Filter::or([a.clone()])), canonical_filter(&a));
    }

    #[test]
    fn test_value_normalization() {
        assert_eq!(canonical_filter(&Filter::eq("Season", 2.0)), canonical_filter(&Filter::eq("Season", 2)));
        assert_eq!(
            canonical_filter(&Filter::eq("meta", json!({"b": 1, "a": 2}))),
            r#"{"eq":{"field":"meta","value":{"a":2,"b":1}}}"#
        );
    }

    #[test]
    fn test_equal_keys_match_the_same_documents() {
        let document = match json!({"tags": [2], "meta": {"n": 1}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let pairs = [
            (Filter::eq("tags", json!([2])), Filter::eq("tags", json!([2.0]))),
            (Filter::eq("meta", json!({"n": 1})), Filter::eq("meta", json!({"n": 1.0}))),
            (Filter::eq("tags", 2), Filter::eq("tags", 2.0)),
            (Filter::eq("tags", json!([2])), Filter::eq("tags", json!([2.5]))),
        ];

        for (a, b) in pairs {
            let same_key = cache_key("results", &a) == cache_key("results", &b);
            let same_match = a.matches(&document) == b.matches(&document);
            assert!(!same_key || same_match, "{a:?} and {b:?} share a key but match differently");
        }
        assert_eq!(
            cache_key("results", &Filter::eq("tags", json!([2.0]))),
            cache_key("results", &Filter::eq("tags", json!([2])))
        );
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(canonical_filter(&Filter::eq("Season", 2)), r#"{"eq":{"field":"Season","value":2}}"#);
    }
}
