use serde_json::{Map, Value};

use super::{Dialect, is_truthy};

/// Native step types that declare a workflow input.
const NATIVE_INPUT_STEP_TYPES: [&str; 3] = ["data_input", "data_collection_input", "parameter_input"];

/// A single declared workflow input.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InputDecl {
    label: String,
    optional: bool,
}

/// Declared input labels of a workflow, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLabels {
    all: Vec<String>,
    required: Vec<String>,
}

impl InputLabels {
    /// All declared input labels.
    #[must_use]
    pub fn all(&self) -> &[String] {
        &self.all
    }

    /// Labels of inputs that have no default and are not marked optional.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.all.iter().any(|l| l == label)
    }

    fn from_decls(decls: Vec<InputDecl>) -> Self {
        let mut labels = Self::default();
        for decl in decls {
            if !decl.optional {
                labels.required.push(decl.label.clone());
            }
            labels.all.push(decl.label);
        }
        labels
    }
}

/// Extract the declared inputs of a workflow document, dispatching on its dialect.
#[must_use]
pub fn input_labels(document: &Map<String, Value>) -> InputLabels {
    let decls = match Dialect::of_mapping(document) {
        Dialect::Format2 => format2_inputs(document),
        Dialect::Native | Dialect::Unknown => native_inputs(document),
    };
    InputLabels::from_decls(decls)
}

/// Scalars usable as a label; mappings and sequences are not.
fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Bool(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}

/// An input is optional when flagged so or when it carries a usable default.
fn declares_optional(decl: &Map<String, Value>) -> bool {
    let optional = match decl.get("optional") {
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        Some(flag) => is_truthy(flag),
        None => false,
    };
    optional || decl.get("default").is_some_and(is_truthy)
}

fn format2_inputs(document: &Map<String, Value>) -> Vec<InputDecl> {
    match document.get("inputs") {
        Some(Value::Object(inputs)) => inputs
            .iter()
            .map(|(label, decl)| InputDecl {
                label: label.clone(),
                optional: decl.as_object().is_some_and(declares_optional),
            })
            .collect(),
        Some(Value::Array(inputs)) => inputs
            .iter()
            .filter_map(|item| match item {
                Value::String(label) => Some(InputDecl {
                    label: label.clone(),
                    optional: false,
                }),
                Value::Object(decl) => decl
                    .get("id")
                    .or_else(|| decl.get("label"))
                    .and_then(scalar_label)
                    .map(|label| InputDecl {
                        label,
                        optional: declares_optional(decl),
                    }),
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
            })
            .collect(),
        Some(_) | None => Vec::new(),
    }
}

fn native_inputs(document: &Map<String, Value>) -> Vec<InputDecl> {
    let Some(steps) = document.get("steps").and_then(Value::as_object) else {
        return Vec::new();
    };

    // Steps are keyed by their order index; non-numeric keys sort last.
    let mut ordered: Vec<(Option<u64>, &Map<String, Value>)> = steps
        .iter()
        .filter_map(|(key, step)| step.as_object().map(|s| (key.parse().ok(), s)))
        .collect();
    ordered.sort_by_key(|(index, _)| index.unwrap_or(u64::MAX));

    ordered
        .into_iter()
        .filter(|(_, step)| {
            step.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| NATIVE_INPUT_STEP_TYPES.contains(&t))
        })
        .filter_map(|(_, step)| {
            native_step_label(step).map(|label| InputDecl {
                label,
                optional: native_tool_state(step).is_some_and(|state| declares_optional(&state)),
            })
        })
        .collect()
}

fn native_step_label(step: &Map<String, Value>) -> Option<String> {
    step.get("label").and_then(scalar_label).or_else(|| {
        step.get("inputs")
            .and_then(Value::as_array)
            .and_then(|inputs| inputs.first())
            .and_then(|input| input.get("name"))
            .and_then(scalar_label)
    })
}

/// Native exports store `tool_state` as a JSON-encoded string; hand-written ones may inline it.
fn native_tool_state(step: &Map<String, Value>) -> Option<Map<String, Value>> {
    match step.get("tool_state")? {
        Value::Object(state) => Some(state.clone()),
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
    }
}
