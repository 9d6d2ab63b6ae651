use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

use super::LintContext;
use super::structure;
use crate::config::{LintConfig, SKIP_TESTS};
use crate::domain::{Dialect, DocumentError, TestCaseProvider, input_labels};
use crate::infrastructure::load_document;

/// Lint one workflow document: its structure, then its test jobs against its inputs.
///
/// `path` must already have been classified as a workflow.
///
/// # Errors
///
/// Returns [`DocumentError`] if the workflow can no longer be read or parsed.
pub fn lint_workflow<P: TestCaseProvider>(
    ctx: &mut LintContext,
    path: &Path,
    config: &LintConfig,
    provider: &P,
) -> Result<(), DocumentError> {
    let Value::Object(document) = load_document(path)? else {
        return Ok(());
    };

    let linter = structure::for_dialect(Dialect::of_mapping(&document));
    debug!("Linting {} as {}", path.display(), linter.name());
    linter.lint(ctx, &document, path);

    if !config.skip.contains(SKIP_TESTS) {
        lint_test_cases(ctx, path, &document, provider);
    }
    Ok(())
}

/// Check every test job of a workflow against the workflow's declared inputs.
///
/// Unknown job keys are warnings; missing required inputs are errors.
fn lint_test_cases<P: TestCaseProvider>(
    ctx: &mut LintContext,
    path: &Path,
    document: &Map<String, Value>,
    provider: &P,
) {
    let test_cases = match provider.cases(path) {
        Ok(test_cases) => test_cases,
        Err(e) => {
            ctx.error(format!("Failed to load workflow test cases: {e}"), Some(path));
            return;
        }
    };
    if test_cases.is_empty() {
        ctx.warn("Workflow missing test cases.", Some(path));
    }

    let i_labels = input_labels(document);
    for test_case in &test_cases {
        let job_keys = test_case.job_keys();

        for key in &job_keys {
            if !i_labels.contains(key) {
                ctx.warn(
                    format!(
                        "Unknown workflow input in test job definition [{key}], workflow inputs are [{}]",
                        i_labels.all().join(", ")
                    ),
                    Some(path),
                );
            }
        }

        for required_label in i_labels.required() {
            if !job_keys.contains(&required_label.as_str()) {
                ctx.error(
                    format!(
                        "Non-optional input has no value specified in workflow test job [{required_label}], job specifies inputs [{}]",
                        job_keys.join(", ")
                    ),
                    Some(path),
                );
            }
        }

        // TODO: check input locations and output labels in the job against the workflow.
    }
}
