//! Structural decode of heterogeneous upstream items.
//!
//! Every candidate field is decoded as an arbitrary JSON value, so decoding
//! can never fail on an unexpected shape. A candidate counts as present when
//! it is a non-empty string or a number; otherwise the next one is tried.

use serde::Deserialize;
use serde_json::Value;

use super::types::NormalizedItem;

pub const NO_TITLE: &str = "No Title";
pub const NO_DESCRIPTION: &str = "No Description";

/// At most this many items are kept from one source per aggregation pass.
pub const MAX_ITEMS_PER_SOURCE: usize = 5;

#[derive(Debug, Default, Deserialize)]
struct RawItem {
    #[serde(default)]
    title: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    url: Value,
    #[serde(default)]
    link: Value,
    #[serde(default)]
    repo_url: Value,
}

fn present(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_present(candidates: &[&Value], fallback: &str) -> String {
    candidates
        .iter()
        .find_map(|v| present(v))
        .unwrap_or_else(|| fallback.to_string())
}

/// Normalize one upstream element. Non-object elements yield the all-sentinel item.
pub fn normalize_item(raw: &Value, source: &str) -> NormalizedItem {
    // Only objects carry named fields; arrays would otherwise decode positionally.
    let it: RawItem = match raw {
        Value::Object(_) => serde_json::from_value(raw.clone()).unwrap_or_default(),
        _ => RawItem::default(),
    };
    NormalizedItem {
        title: first_present(&[&it.title, &it.name, &it.id], NO_TITLE),
        description: first_present(&[&it.description, &it.content], NO_DESCRIPTION),
        url: first_present(&[&it.url, &it.link, &it.repo_url], ""),
        source: source.to_string(),
    }
}

/// Turn a cached or freshly fetched payload into at most
/// [`MAX_ITEMS_PER_SOURCE`] items. Anything but an array yields nothing.
pub fn items_from_payload(payload: &Value, source: &str) -> Vec<NormalizedItem> {
    match payload {
        Value::Array(items) => items
            .iter()
            .take(MAX_ITEMS_PER_SOURCE)
            .map(|raw| normalize_item(raw, source))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_fields_are_used() {
        let it = normalize_item(&json!({ "name": "X", "content": "Y", "link": "Z" }), "GitHub");
        assert_eq!(
            it,
            NormalizedItem {
                title: "X".into(),
                description: "Y".into(),
                url: "Z".into(),
                source: "GitHub".into(),
            }
        );
    }

    #[test]
    fn empty_object_gets_sentinels() {
        let it = normalize_item(&json!({}), "HF");
        assert_eq!(it.title, NO_TITLE);
        assert_eq!(it.description, NO_DESCRIPTION);
        assert_eq!(it.url, "");
        assert_eq!(it.source, "HF");
    }

    #[test]
    fn primary_field_wins_and_empty_strings_fall_through() {
        let it = normalize_item(
            &json!({ "title": "", "name": "named", "id": "id-1", "description": "d", "content": "c",
                     "url": null, "repo_url": "https://r" }),
            "S",
        );
        assert_eq!(it.title, "named");
        assert_eq!(it.description, "d");
        assert_eq!(it.url, "https://r");
    }

    #[test]
    fn numeric_id_and_odd_shapes_never_fail() {
        let it = normalize_item(&json!({ "id": 17, "description": ["not", "text"] }), "S");
        assert_eq!(it.title, "17");
        assert_eq!(it.description, NO_DESCRIPTION);

        let scalar = normalize_item(&json!("just a string"), "S");
        assert_eq!(scalar.title, NO_TITLE);
    }

    #[test]
    fn payload_is_capped_at_five_and_non_arrays_yield_nothing() {
        let many: Vec<Value> = (0..9).map(|i| json!({ "title": format!("t{i}") })).collect();
        let out = items_from_payload(&Value::Array(many), "S");
        assert_eq!(out.len(), MAX_ITEMS_PER_SOURCE);
        assert_eq!(out[4].title, "t4");

        assert!(items_from_payload(&json!({ "error": "rate limited" }), "S").is_empty());
        assert!(items_from_payload(&Value::Null, "S").is_empty());
    }
}
