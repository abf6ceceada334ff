//! Output rendering: YAML by default, JSON on request, with empty keys
//! stripped recursively first.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Recursively drop nulls, empty sequences, and empty mappings. Running it
/// twice equals running it once.
pub fn remove_empty_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, remove_empty_keys(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(remove_empty_keys)
                .filter(|v| !v.is_null())
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Render a payload in the requested format, after empty-key stripping.
pub fn render<T: Serialize>(payload: &T, format: OutputFormat) -> Result<String> {
    let value = remove_empty_keys(serde_json::to_value(payload)?);
    render_raw(&value, format)
}

/// Render a value as-is (the `--raw` path skips empty-key stripping).
pub fn render_raw<T: Serialize>(payload: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(payload)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(payload)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_nulls_empty_arrays_and_empty_objects() {
        let cleaned = remove_empty_keys(json!({
            "keep": "value",
            "nothing": null,
            "empty_list": [],
            "empty_map": {},
            "nested": {"inner": {}, "value": 1},
            "list": [1, null, {"x": []}]
        }));

        assert_eq!(
            cleaned,
            json!({
                "keep": "value",
                "nested": {"value": 1},
                "list": [1, {}]
            })
        );
    }

    #[test]
    fn zero_and_false_are_not_empty() {
        let cleaned = remove_empty_keys(json!({"zero": 0, "off": false, "blank": ""}));
        assert_eq!(cleaned, json!({"zero": 0, "off": false, "blank": ""}));
    }

    #[test]
    fn remove_empty_keys_is_idempotent() {
        let input = json!({
            "a": {"b": [], "c": {"d": null}},
            "e": [null, [], {"f": 1}]
        });
        let once = remove_empty_keys(input);
        let twice = remove_empty_keys(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn yaml_is_the_default_format() {
        assert_eq!(OutputFormat::default(), OutputFormat::Yaml);
    }

    #[test]
    fn render_emits_requested_format() {
        #[derive(Serialize)]
        struct Payload {
            name: &'static str,
            empty: Vec<u8>,
        }
        let payload = Payload {
            name: "design",
            empty: Vec::new(),
        };

        let yaml = render(&payload, OutputFormat::Yaml).expect("yaml");
        assert!(yaml.contains("name: design"));
        assert!(!yaml.contains("empty"));

        let json_text = render(&payload, OutputFormat::Json).expect("json");
        let parsed: Value = serde_json::from_str(&json_text).expect("valid json");
        assert_eq!(parsed["name"], "design");
        assert!(parsed.get("empty").is_none());
    }
}
