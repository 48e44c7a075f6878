//! Structured query filters over JSON documents.
//!
//! A [`Filter`] is an immutable predicate. Field paths are dotted
//! (`Fixtures.Special`); when a path step lands on an array, the predicate
//! holds if any element satisfies the rest of the path.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::document::Document;

/// A predicate describing which documents in a collection match a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Equality on a (possibly dotted) field path.
    Eq { field: String, value: Value },
    /// Every clause matches. An empty list matches everything.
    And(Vec<Filter>),
    /// At least one clause matches. An empty list matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq { field: field.into(), value: value.into() }
    }

    pub fn and(clauses: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(clauses.into_iter().collect())
    }

    pub fn or(clauses: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(clauses.into_iter().collect())
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::Eq { field, value } => {
                let segments: Vec<&str> = field.split('.').collect();
                match document.get(segments[0]) {
                    Some(child) => path_matches(child, &segments[1..], value),
                    None => value.is_null(),
                }
            }
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(document)),
            Filter::Or(clauses) => clauses.iter().any(|c| c.matches(document)),
        }
    }
}

fn path_matches(current: &Value, rest: &[&str], expected: &Value) -> bool {
    match current {
        Value::Array(items) if rest.is_empty() => {
            values_equal(current, expected) || items.iter().any(|item| values_equal(item, expected))
        }
        Value::Array(items) => items.iter().any(|item| path_matches(item, rest, expected)),
        _ if rest.is_empty() => values_equal(current, expected),
        Value::Object(map) => match map.get(rest[0]) {
            Some(child) => path_matches(child, &rest[1..], expected),
            None => expected.is_null(),
        },
        _ => false,
    }
}

/// Equality with numeric coercion at every depth, so `2`, `2.0` and `[2.0]`
/// compare equal to `2`, `2` and `[2]`. Cache keys normalize numbers the
/// same way; the two must agree on which filters are equal.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len() && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Integers compare exactly; a float equals an integer only if it is that
/// exact integral value.
fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (integer(x), integer(y)) {
        (Some(a), Some(b)) => a == b,
        (Some(i), None) => float_is(y, i),
        (None, Some(i)) => float_is(x, i),
        (None, None) => x.as_f64() == y.as_f64(),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

fn float_is(n: &Number, i: i128) -> bool {
    n.as_f64()
        .is_some_and(|f| f.fract() == 0.0 && f.abs() < 18_446_744_073_709_551_616.0 && f as i128 == i)
}
