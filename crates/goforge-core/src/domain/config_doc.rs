//! The generated project's `config/config.json` document.

use serde_json::{Map, Value, json};

/// Top-level JSON object built by overlaying fragments.
///
/// Overlay is shallow: a later fragment replaces a colliding top-level key
/// wholesale. Keys keep the position of their first insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig(Map<String, Value>);

impl MergedConfig {
    /// Start from the default logging section (lowest precedence).
    pub fn baseline() -> Self {
        let mut doc = Self::empty();
        doc.overlay_baseline();
        doc
    }

    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Parse a fragment; only JSON objects are accepted.
    pub fn parse_fragment(raw: &str) -> Result<Map<String, Value>, String> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_type(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Last-writer-wins overlay of a fragment's top-level keys.
    pub fn overlay(&mut self, fragment: Map<String, Value>) {
        for (key, value) in fragment {
            self.0.insert(key, value);
        }
    }

    /// Overlay the default logging section.
    pub fn overlay_baseline(&mut self) {
        self.overlay(baseline_fragment());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Two-space indented JSON followed by a newline.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(&self.0)?;
        out.push('\n');
        Ok(out)
    }
}

fn baseline_fragment() -> Map<String, Value> {
    let value = json!({
        "log": {
            "level": "info",
            "format": "json"
        }
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(raw: &str) -> Map<String, Value> {
        MergedConfig::parse_fragment(raw).unwrap()
    }

    #[test]
    fn later_fragment_wins_on_collision() {
        let mut doc = MergedConfig::empty();
        doc.overlay(fragment(r#"{"x": 1}"#));
        doc.overlay(fragment(r#"{"x": 2}"#));
        assert_eq!(doc.get("x"), Some(&json!(2)));
    }

    #[test]
    fn disjoint_keys_survive() {
        let mut doc = MergedConfig::empty();
        doc.overlay(fragment(r#"{"server": {"port": 8080}}"#));
        doc.overlay(fragment(r#"{"redis": {"addr": "localhost:6379"}}"#));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["server", "redis"]);
    }

    #[test]
    fn overlay_is_shallow() {
        let mut doc = MergedConfig::empty();
        doc.overlay(fragment(r#"{"db": {"host": "a", "port": 1}}"#));
        doc.overlay(fragment(r#"{"db": {"host": "b"}}"#));
        assert_eq!(doc.get("db"), Some(&json!({"host": "b"})));
    }

    #[test]
    fn baseline_has_lowest_precedence() {
        let mut doc = MergedConfig::baseline();
        assert_eq!(doc.get("log").unwrap()["level"], "info");

        doc.overlay(fragment(r#"{"log": {"level": "debug"}}"#));
        assert_eq!(doc.get("log"), Some(&json!({"level": "debug"})));
    }

    #[test]
    fn rejects_non_object_fragments() {
        assert!(MergedConfig::parse_fragment("[1, 2]").is_err());
        assert!(MergedConfig::parse_fragment("{not json").is_err());
    }

    #[test]
    fn pretty_output_is_stable() {
        let mut doc = MergedConfig::empty();
        doc.overlay(fragment(r#"{"b": 1, "a": true}"#));
        assert_eq!(doc.to_pretty_json().unwrap(), "{\n  \"b\": 1,\n  \"a\": true\n}\n");
    }
}
