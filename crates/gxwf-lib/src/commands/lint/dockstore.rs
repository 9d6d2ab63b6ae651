use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

use super::LintContext;
use crate::domain::{
    DOCKSTORE_REGISTRY_CONF, RECOMMENDED_ENTRY_KEYS, REQUIRED_ENTRY_KEYS, resolve_reference,
};
use crate::infrastructure::load_document;

/// Lint a `.dockstore.yml` manifest and the files its entries reference.
///
/// Each stage that fails records one error and stops; entries are checked
/// independently of each other.
pub fn lint_dockstore_config(ctx: &mut LintContext, path: &Path) {
    debug!("Linting Dockstore manifest {}", path.display());

    let Ok(dockstore_yaml) = load_document(path) else {
        ctx.error(
            format!("Invalid YAML found in {DOCKSTORE_REGISTRY_CONF}"),
            Some(path),
        );
        return;
    };

    let Value::Object(dockstore_yaml) = dockstore_yaml else {
        ctx.error(
            format!("Invalid YAML contents found in {DOCKSTORE_REGISTRY_CONF}"),
            Some(path),
        );
        return;
    };

    let Some(workflow_entries) = dockstore_yaml.get("workflows") else {
        ctx.error(
            format!("Invalid YAML contents found in {DOCKSTORE_REGISTRY_CONF}, no workflows defined"),
            Some(path),
        );
        return;
    };

    let Value::Array(workflow_entries) = workflow_entries else {
        ctx.error(
            format!("Invalid YAML contents found in {DOCKSTORE_REGISTRY_CONF}, workflows not a list"),
            Some(path),
        );
        return;
    };

    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    for workflow_entry in workflow_entries {
        lint_workflow_entry(ctx, path, directory, workflow_entry);
    }
}

fn lint_workflow_entry(ctx: &mut LintContext, path: &Path, directory: &Path, entry: &Value) {
    let Value::Object(entry) = entry else {
        ctx.error(
            format!("Invalid YAML contents found in {DOCKSTORE_REGISTRY_CONF}, workflow entry not a dict"),
            Some(path),
        );
        return;
    };

    let mut found_errors = false;
    for required_key in REQUIRED_ENTRY_KEYS {
        if !entry.contains_key(required_key) {
            ctx.error(
                format!("{DOCKSTORE_REGISTRY_CONF} workflow entry missing required key {required_key}"),
                Some(path),
            );
            found_errors = true;
        }
    }

    for recommended_key in RECOMMENDED_ENTRY_KEYS {
        if !entry.contains_key(recommended_key) {
            ctx.warn(
                format!("{DOCKSTORE_REGISTRY_CONF} workflow entry missing recommended key {recommended_key}"),
                Some(path),
            );
        }
    }

    // Don't check referenced files of a broken entry.
    if found_errors {
        return;
    }

    // TODO: validate subclass against the workflow languages Dockstore accepts.
    for referenced_file in referenced_files(ctx, path, entry) {
        if !resolve_reference(directory, referenced_file).exists() {
            ctx.error(
                format!("{DOCKSTORE_REGISTRY_CONF} workflow entry references absent file {referenced_file}"),
                Some(path),
            );
        }
    }
}

/// The descriptor path followed by every test parameter file of an entry.
/// Values that are not strings are recorded as errors and left out.
fn referenced_files<'entry>(
    ctx: &mut LintContext,
    path: &Path,
    entry: &'entry Map<String, Value>,
) -> Vec<&'entry str> {
    let mut referenced = Vec::new();

    match entry.get("primaryDescriptorPath") {
        Some(Value::String(descriptor_path)) => referenced.push(descriptor_path.as_str()),
        Some(_) | None => ctx.error(
            format!("{DOCKSTORE_REGISTRY_CONF} workflow entry primaryDescriptorPath not a string"),
            Some(path),
        ),
    }

    match entry.get("testParameterFiles") {
        None => {}
        Some(Value::Array(test_files)) => {
            for test_file in test_files {
                match test_file {
                    Value::String(test_file) => referenced.push(test_file.as_str()),
                    Value::Null
                    | Value::Bool(_)
                    | Value::Number(_)
                    | Value::Array(_)
                    | Value::Object(_) => ctx.error(
                        format!("{DOCKSTORE_REGISTRY_CONF} workflow entry testParameterFiles entry not a string"),
                        Some(path),
                    ),
                }
            }
        }
        Some(_) => ctx.error(
            format!("{DOCKSTORE_REGISTRY_CONF} workflow entry testParameterFiles not a list"),
            Some(path),
        ),
    }

    referenced
}
