//! Maps the API's assorted record shapes into [`RemedyRecord`]
//!
//! Older endpoints wrap results differently and spread the same field over
//! several names. Everything downstream works on the canonical record only.

use serde_json::{Map, Value};

use super::record::{LookupPayload, Proving, RemedyRecord};

const WRAPPER_FIELDS: [&str; 3] = ["results", "data", "remedies"];
const NAME_FIELDS: [&str; 4] = ["remedy", "name", "remedy_name", "title"];
const FAMILY_FIELDS: [&str; 2] = ["family", "kingdom"];

/// Normalizes a raw JSON response body into a payload
pub fn normalize_payload(value: Value) -> LookupPayload {
    match value {
        Value::Array(items) => LookupPayload::Records(items.iter().map(normalize_record).collect()),
        Value::Object(map) => {
            if let Some(inner) = unwrap_wrapper(&map) {
                return normalize_payload(inner.clone());
            }
            LookupPayload::Record(record_from_map(&map))
        }
        Value::String(text) => LookupPayload::Text(text),
        Value::Null => LookupPayload::Text(String::new()),
        other => LookupPayload::Text(other.to_string()),
    }
}

/// Normalizes a single record; non-object values yield a record named after the value
pub fn normalize_record(value: &Value) -> RemedyRecord {
    match value {
        Value::Object(map) => record_from_map(map),
        Value::String(name) => RemedyRecord::named(name.clone()),
        _ => RemedyRecord::default(),
    }
}

fn unwrap_wrapper(map: &Map<String, Value>) -> Option<&Value> {
    if NAME_FIELDS.iter().any(|f| map.contains_key(*f)) {
        return None;
    }

    WRAPPER_FIELDS
        .iter()
        .filter_map(|f| map.get(*f))
        .find(|v| v.is_array() || v.is_object())
}

fn record_from_map(map: &Map<String, Value>) -> RemedyRecord {
    let mut sources = string_list(map.get("sources"), &["author", "title", "name"]);

    if let Some(author) = legacy_source_author(map) {
        if !sources.iter().any(|s| s == &author) {
            sources.push(author);
        }
    }

    RemedyRecord {
        name: first_string(map, &NAME_FIELDS).unwrap_or_default(),
        family: first_string(map, &FAMILY_FIELDS),
        keynotes: string_list(map.get("keynotes"), &["text", "keynote"]),
        summary: first_string(map, &["summary", "description"]),
        sources,
        provings: provings(map.get("provings")),
        confidence: None,
    }
}

fn first_string(map: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| map.get(*f))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads an array whose items are strings or objects carrying one of `fields`
fn string_list(value: Option<&Value>, fields: &[&str]) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(obj) => first_string(obj, fields),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn legacy_source_author(map: &Map<String, Value>) -> Option<String> {
    let nested = |outer: &str| {
        map.get(outer)
            .and_then(Value::as_object)
            .and_then(|obj| first_string(obj, &["author", "source_author"]))
    };

    first_string(map, &["source_author"])
        .or_else(|| nested("source"))
        .or_else(|| nested("metadata"))
}

fn provings(value: Option<&Value>) -> Vec<Proving> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(Proving::new("", text.trim())),
            Value::Object(obj) => {
                let text = first_string(obj, &["text", "excerpt"])?;
                let source = first_string(obj, &["source", "author"]).unwrap_or_default();
                Some(Proving::new(source, text))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_record() {
        let payload = normalize_payload(json!({
            "remedy": "Arsenicum album",
            "family": "Mineral",
            "keynotes": ["restlessness", "fear of death"],
            "sources": ["Kent"],
            "provings": [{"source": "Hahnemann", "text": "Great anguish"}]
        }));

        let LookupPayload::Record(record) = payload else {
            panic!("expected a single record");
        };
        assert_eq!(record.name, "Arsenicum album");
        assert_eq!(record.family.as_deref(), Some("Mineral"));
        assert_eq!(record.keynotes.len(), 2);
        assert_eq!(record.provings[0], Proving::new("Hahnemann", "Great anguish"));
    }

    #[test]
    fn test_wrapped_results_list() {
        let payload = normalize_payload(json!({
            "results": [{"name": "Sulphur"}, {"remedy_name": "Sepia"}],
            "total": 2
        }));

        let names: Vec<_> = payload.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sulphur", "Sepia"]);
    }

    #[test]
    fn test_legacy_source_author_locations() {
        let flat = normalize_record(&json!({"name": "A", "source_author": "Boericke"}));
        assert_eq!(flat.sources, vec!["Boericke"]);

        let nested = normalize_record(&json!({"name": "B", "source": {"author": "Clarke"}}));
        assert_eq!(nested.sources, vec!["Clarke"]);

        let meta = normalize_record(&json!({
            "name": "C",
            "sources": ["Kent"],
            "metadata": {"source_author": "Allen"}
        }));
        assert_eq!(meta.sources, vec!["Kent", "Allen"]);
    }

    #[test]
    fn test_object_keynotes_and_sources() {
        let record = normalize_record(&json!({
            "name": "Lachesis",
            "kingdom": "Animal",
            "keynotes": [{"text": "left-sided"}, "loquacity", 7],
            "sources": [{"author": "Hering"}, {"title": "Guiding Symptoms"}]
        }));

        assert_eq!(record.family.as_deref(), Some("Animal"));
        assert_eq!(record.keynotes, vec!["left-sided", "loquacity"]);
        assert_eq!(record.sources, vec!["Hering", "Guiding Symptoms"]);
    }

    #[test]
    fn test_malformed_fields_default_to_empty() {
        let record = normalize_record(&json!({
            "name": "Nux vomica",
            "keynotes": "irritable",
            "sources": null,
            "provings": {"text": "not a list"}
        }));

        assert!(record.keynotes.is_empty());
        assert!(record.sources.is_empty());
        assert!(record.provings.is_empty());
    }

    #[test]
    fn test_proving_variants() {
        let record = normalize_record(&json!({
            "name": "Bryonia",
            "provings": ["worse from motion", {"author": "Hahnemann", "excerpt": "dry lips"}, {"source": "x"}]
        }));

        assert_eq!(
            record.provings,
            vec![
                Proving::new("", "worse from motion"),
                Proving::new("Hahnemann", "dry lips"),
            ]
        );
    }

    #[test]
    fn test_scalars_become_text() {
        assert_eq!(normalize_payload(json!("No results")), LookupPayload::Text("No results".into()));
        assert_eq!(normalize_payload(Value::Null), LookupPayload::Text(String::new()));
        assert_eq!(normalize_payload(json!(42)), LookupPayload::Text("42".into()));
    }

    #[test]
    fn test_object_with_name_and_data_is_not_unwrapped() {
        let payload = normalize_payload(json!({"remedy": "Ignatia", "data": [1, 2]}));
        assert_eq!(payload.primary().unwrap().name, "Ignatia");
    }
}
