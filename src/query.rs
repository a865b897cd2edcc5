//! Query-string construction for the filtered measurement endpoints.

use crate::models::{DEFAULT_TIMESTAMP_END, DEFAULT_TIMESTAMP_START, Selection};
use serde::Serialize;
use std::collections::BTreeMap;

/// Query parameters for one request. Only supplied filters appear as keys;
/// the two date bounds are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryFilter(BTreeMap<String, String>);

impl QueryFilter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build the query for a filtered endpoint.
///
/// - `station` goes under `station`, `filter` under `filter_key`
///   (`parameter`, `analyte`, ...). Lists are joined with `,`.
/// - `timestamp_start` / `timestamp_end` default to `1900-01-01` / `2100-01-01`.
///
/// Dates and names are passed through untouched; the service does the validation.
///
/// ```
/// use pghydro_rs::query::build_query;
///
/// let q = build_query("analyte", Some("P1".into()), Some(["Ca", "Cl"].into()), None, None);
/// assert_eq!(q.get("analyte"), Some("Ca,Cl"));
/// assert_eq!(q.get("timestamp_start"), Some("1900-01-01"));
/// ```
pub fn build_query(
    filter_key: &str,
    station: Option<Selection>,
    filter: Option<Selection>,
    timestamp_start: Option<&str>,
    timestamp_end: Option<&str>,
) -> QueryFilter {
    let mut params = BTreeMap::new();
    if let Some(s) = station {
        params.insert("station".to_string(), s.to_query_value());
    }
    if let Some(f) = filter {
        params.insert(filter_key.to_string(), f.to_query_value());
    }
    params.insert(
        "timestamp_start".to_string(),
        timestamp_start.unwrap_or(DEFAULT_TIMESTAMP_START).to_string(),
    );
    params.insert(
        "timestamp_end".to_string(),
        timestamp_end.unwrap_or(DEFAULT_TIMESTAMP_END).to_string(),
    );
    QueryFilter(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only_when_nothing_supplied() {
        let q = build_query("parameter", None, None, None, None);
        assert_eq!(q.len(), 2);
        assert_eq!(q.get("timestamp_start"), Some("1900-01-01"));
        assert_eq!(q.get("timestamp_end"), Some("2100-01-01"));
        assert!(!q.contains_key("station"));
        assert!(!q.contains_key("parameter"));
    }

    #[test]
    fn supplied_bounds_win_over_defaults() {
        let q = build_query("parameter", None, None, Some("2020-01-01"), Some("2021-06-30"));
        assert_eq!(q.get("timestamp_start"), Some("2020-01-01"));
        assert_eq!(q.get("timestamp_end"), Some("2021-06-30"));
    }

    #[test]
    fn serializes_as_flat_map() {
        let q = build_query("analyte", Some("P1".into()), None, None, None);
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["station"], "P1");
        assert_eq!(v["timestamp_end"], "2100-01-01");
    }
}
