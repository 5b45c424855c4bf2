//! Helpers for turning typed queries into URLs.
//!
//! - Query structs are flattened to `key=value` pairs through `serde_json`
//! - `null` values are dropped, arrays repeat their key
//! - Percent-encoding is left to [`url::Url::query_pairs_mut`]

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::Result;

/// Flattens a serializable query into string pairs, in field order.
pub(super) fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    match serde_json::to_value(query)? {
        Value::Object(map) => {
            for (key, value) in map {
                push_pair(&mut pairs, &key, value);
            }
        }
        Value::Null => {}
        other => log::debug!("ignoring non-object query {other}"),
    }
    Ok(pairs)
}

fn push_pair(pairs: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_owned(), s)),
        Value::Array(items) => {
            for item in items {
                push_pair(pairs, key, item);
            }
        }
        other => pairs.push((key.to_owned(), other.to_string())),
    }
}

/// Joins `base` and an absolute `path` by concatenation, so a base with a
/// path of its own (`/api/underdog`) keeps it, then appends `pairs`.
pub(super) fn join_url(base: &Url, path: &str, pairs: &[(String, String)]) -> Result<Url> {
    let mut url: Url = format!("{}{path}", base.as_str().trim_end_matches('/')).parse()?;
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}
