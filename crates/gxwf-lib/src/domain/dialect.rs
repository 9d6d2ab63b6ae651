use serde_json::{Map, Value};

/// `class` value that marks a format2 workflow.
pub const FORMAT2_CLASS: &str = "GalaxyWorkflow";

/// Top-level key that marks a native Galaxy workflow export.
pub const NATIVE_MARKER: &str = "a_galaxy_workflow";

/// The workflow dialect a parsed document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// YAML documents with `class: GalaxyWorkflow`
    Format2,
    /// Native `.ga` exports carrying a truthy `a_galaxy_workflow`
    Native,
    /// Anything else, including documents that are not mappings
    Unknown,
}

impl Dialect {
    /// Classify any parsed document. A document that is not a mapping is never a workflow.
    #[must_use]
    pub fn classify(document: &Value) -> Self {
        match document {
            Value::Object(map) => Self::of_mapping(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                Self::Unknown
            }
        }
    }

    /// Classify a mapping by its `class` field or native marker.
    #[must_use]
    pub fn of_mapping(map: &Map<String, Value>) -> Self {
        if map.get("class").and_then(Value::as_str) == Some(FORMAT2_CLASS) {
            Self::Format2
        } else if map.get(NATIVE_MARKER).is_some_and(is_truthy) {
            Self::Native
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub fn is_workflow(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Truthiness of a parsed value the way YAML-hosted tooling reads flags.
///
/// Null, `false`, zero, and empty strings, sequences or mappings are falsy.
/// Note that the string `"false"` is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format2_class_is_detected() {
        let doc = json!({"class": "GalaxyWorkflow", "steps": {}});
        assert_eq!(Dialect::classify(&doc), Dialect::Format2);
    }

    #[test]
    fn native_marker_must_be_truthy() {
        assert_eq!(
            Dialect::classify(&json!({"a_galaxy_workflow": "true"})),
            Dialect::Native
        );
        assert_eq!(
            Dialect::classify(&json!({"a_galaxy_workflow": true})),
            Dialect::Native
        );
        assert_eq!(
            Dialect::classify(&json!({"a_galaxy_workflow": ""})),
            Dialect::Unknown
        );
        assert_eq!(
            Dialect::classify(&json!({"a_galaxy_workflow": null})),
            Dialect::Unknown
        );
    }

    #[test]
    fn other_class_is_unknown() {
        let doc = json!({"class": "Workflow", "cwlVersion": "v1.2"});
        assert_eq!(Dialect::classify(&doc), Dialect::Unknown);
        assert!(!Dialect::classify(&doc).is_workflow());
    }

    #[test]
    fn non_mappings_are_never_workflows() {
        assert_eq!(
            Dialect::classify(&json!([{"class": "GalaxyWorkflow"}])),
            Dialect::Unknown
        );
        assert_eq!(Dialect::classify(&json!("GalaxyWorkflow")), Dialect::Unknown);
        assert_eq!(Dialect::classify(&Value::Null), Dialect::Unknown);
    }

    #[test]
    fn truthiness_follows_yaml_hosts() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("false")));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!({"a": 1})));
    }
}
