use serde_json::{Map, Value};
use std::path::Path;

use super::LintContext;
use super::structure::{OutputScan, StructuralLinter};
use crate::domain::is_truthy;

/// Structural checks for format2 (`class: GalaxyWorkflow`) documents.
pub struct Format2Linter;

impl StructuralLinter for Format2Linter {
    fn name(&self) -> &'static str {
        "format2"
    }

    fn lint(&self, ctx: &mut LintContext, document: &Map<String, Value>, path: &Path) {
        match document.get("steps") {
            Some(Value::Object(_) | Value::Array(_)) => {}
            Some(_) => ctx.error("expected [steps] to be a dict or a list", Some(path)),
            None => ctx.error("expected to find key [steps]", Some(path)),
        }

        if let Some(inputs) = document.get("inputs") {
            lint_inputs(ctx, inputs, path);
        }

        let mut outputs = OutputScan::default();
        match document.get("outputs") {
            // Mapping keys are output labels.
            Some(Value::Object(declared)) => {
                if !declared.is_empty() {
                    outputs.record(true);
                }
            }
            Some(Value::Array(declared)) => {
                for output in declared {
                    outputs.record(list_entry_label(output).is_some());
                }
            }
            Some(_) => ctx.error("expected [outputs] to be a dict or a list", Some(path)),
            None => {}
        }
        outputs.report(ctx, path);
    }
}

/// The label of an `inputs`/`outputs` list entry: a bare string, or `id`/`label` of a mapping.
fn list_entry_label(entry: &Value) -> Option<&Value> {
    match entry {
        Value::String(_) => Some(entry),
        Value::Object(decl) => decl
            .get("id")
            .or_else(|| decl.get("label"))
            .filter(|label| is_truthy(label)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
    }
}

fn lint_inputs(ctx: &mut LintContext, inputs: &Value, path: &Path) {
    match inputs {
        Value::Object(_) => {}
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                if list_entry_label(entry).is_none() {
                    ctx.error(format!("[inputs] entry {index} has no id or label"), Some(path));
                }
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            ctx.error("expected [inputs] to be a dict or a list", Some(path));
        }
    }
}
