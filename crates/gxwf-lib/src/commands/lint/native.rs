use serde_json::{Map, Value};
use std::path::Path;

use super::LintContext;
use super::structure::{OutputScan, StructuralLinter};
use crate::domain::{NATIVE_MARKER, is_truthy};

/// The only native export format version in use.
const NATIVE_FORMAT_VERSION: &str = "0.1";

/// Structural checks for native Galaxy workflow exports (`.ga`).
pub struct NativeLinter;

impl StructuralLinter for NativeLinter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn lint(&self, ctx: &mut LintContext, document: &Map<String, Value>, path: &Path) {
        if let Some(outputs) = lint_workflow(ctx, document, path) {
            outputs.report(ctx, path);
        }
    }
}

/// Check one native workflow, recursing into embedded subworkflows.
/// Returns the outputs seen, or `None` when the workflow has no usable steps.
fn lint_workflow(
    ctx: &mut LintContext,
    document: &Map<String, Value>,
    path: &Path,
) -> Option<OutputScan> {
    if document.get("format-version").and_then(Value::as_str) != Some(NATIVE_FORMAT_VERSION) {
        ctx.error("Invalid native Galaxy workflow format version", Some(path));
    }

    let marker_ok = match document.get(NATIVE_MARKER) {
        Some(Value::String(marker)) => marker == "true",
        Some(Value::Bool(marker)) => *marker,
        Some(_) | None => false,
    };
    if !marker_ok {
        ctx.error(
            format!("expected to find key [{NATIVE_MARKER}] with value [true]"),
            Some(path),
        );
    }

    let Some(steps) = document
        .get("steps")
        .and_then(Value::as_object)
        .filter(|steps| !steps.is_empty())
    else {
        ctx.error("expected to find key [steps] with a dict", Some(path));
        return None;
    };

    let mut outputs = OutputScan::default();
    for (order_index, step) in steps {
        if order_index.parse::<u64>().is_err() {
            ctx.error(
                format!("expected step_key to be integer not [{order_index}]"),
                Some(path),
            );
        }
        let Some(step) = step.as_object() else {
            ctx.error(format!("step [{order_index}] is not a dict"), Some(path));
            continue;
        };

        if let Some(workflow_outputs) = step.get("workflow_outputs").and_then(Value::as_array) {
            for workflow_output in workflow_outputs {
                outputs.record(workflow_output.get("label").is_some_and(is_truthy));
            }
        }

        if step.get("type").and_then(Value::as_str) == Some("subworkflow") {
            match step.get("subworkflow") {
                // Subworkflow outputs are not outputs of this workflow.
                Some(Value::Object(subworkflow)) => {
                    lint_workflow(ctx, subworkflow, path);
                }
                Some(_) | None => ctx.error(
                    format!("subworkflow step [{order_index}] has no embedded subworkflow"),
                    Some(path),
                ),
            }
        }
    }
    Some(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lint(document: &Value) -> LintContext {
        let mut ctx = LintContext::new();
        NativeLinter.lint(&mut ctx, document.as_object().unwrap(), Path::new("wf.ga"));
        ctx
    }

    fn messages(ctx: &LintContext) -> Vec<&str> {
        ctx.diagnostics().iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn valid_workflow_is_clean() {
        let ctx = lint(&json!({
            "a_galaxy_workflow": "true",
            "format-version": "0.1",
            "steps": {
                "0": {"type": "data_input", "label": "input"},
                "1": {
                    "type": "tool",
                    "workflow_outputs": [{"label": "out_file", "output_name": "out_file1"}]
                }
            }
        }));
        assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
    }

    #[test]
    fn bad_version_and_marker() {
        let ctx = lint(&json!({
            "a_galaxy_workflow": "yes",
            "format-version": "0.2",
            "steps": {"0": {"type": "tool", "workflow_outputs": [{"label": "o"}]}}
        }));
        assert_eq!(ctx.error_count(), 2);
        assert!(messages(&ctx).iter().any(|m| m.contains("format version")));
    }

    #[test]
    fn missing_steps_stops_checks() {
        let ctx = lint(&json!({"a_galaxy_workflow": "true", "format-version": "0.1"}));
        assert_eq!(messages(&ctx), vec!["expected to find key [steps] with a dict"]);
        assert_eq!(ctx.warn_count(), 0);
    }

    #[test]
    fn non_integer_step_key_and_output_warnings() {
        let ctx = lint(&json!({
            "a_galaxy_workflow": "true",
            "format-version": "0.1",
            "steps": {"first": {"type": "tool"}}
        }));
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(
            messages(&ctx),
            vec![
                "expected step_key to be integer not [first]",
                "Workflow contained no outputs"
            ]
        );
    }

    #[test]
    fn unlabelled_output_is_a_warning() {
        let ctx = lint(&json!({
            "a_galaxy_workflow": "true",
            "format-version": "0.1",
            "steps": {"0": {"type": "tool", "workflow_outputs": [{"label": null}]}}
        }));
        assert_eq!(messages(&ctx), vec!["Workflow contained output without a label"]);
    }

    #[test]
    fn embedded_subworkflow_is_checked() {
        let ctx = lint(&json!({
            "a_galaxy_workflow": "true",
            "format-version": "0.1",
            "steps": {
                "0": {
                    "type": "subworkflow",
                    "workflow_outputs": [{"label": "o"}],
                    "subworkflow": {"a_galaxy_workflow": "true", "format-version": "0.1"}
                }
            }
        }));
        assert_eq!(messages(&ctx), vec!["expected to find key [steps] with a dict"]);
    }
}
