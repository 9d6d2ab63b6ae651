use log::debug;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::load_document;
use crate::domain::{DocumentError, TestCase, TestCaseProvider};

/// Suffixes appended to a workflow's base name to find its test definitions.
const TEST_SUFFIXES: [&str; 4] = ["-tests", "_tests", "-test", "_test"];

/// Extensions a test definition file may carry.
const TEST_EXTENSIONS: [&str; 3] = [".yml", ".yaml", ".json"];

/// Compound extensions stripped as a whole when deriving a workflow's base name.
const COMPOUND_EXTENSIONS: [&str; 2] = [".gxwf.yml", ".gxwf.yaml"];

/// The workflow file name without its extension.
fn workflow_base_name(workflow_path: &Path) -> Option<String> {
    let name = workflow_path.file_name()?.to_str()?;
    let base = COMPOUND_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .or_else(|| Path::new(name).file_stem().and_then(|stem| stem.to_str()))?;
    Some(base.to_owned())
}

/// Locate the test definition file that sits next to a workflow, if any.
#[must_use]
pub fn test_file_for(workflow_path: &Path) -> Option<PathBuf> {
    let base = workflow_base_name(workflow_path)?;
    let base = base.as_str();
    let directory = workflow_path.parent().unwrap_or_else(|| Path::new(""));
    TEST_SUFFIXES
        .iter()
        .flat_map(|suffix| {
            TEST_EXTENSIONS
                .iter()
                .map(move |ext| format!("{base}{suffix}{ext}"))
        })
        .map(|name| directory.join(name))
        .find(|candidate| candidate.is_file())
}

/// Test cases read from `<workflow>-tests.yml` style files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTestCases;

impl TestCaseProvider for FileTestCases {
    fn cases(&self, workflow_path: &Path) -> Result<Vec<TestCase>, DocumentError> {
        let Some(test_path) = test_file_for(workflow_path) else {
            return Ok(Vec::new());
        };
        debug!("Reading test cases from {}", test_path.display());

        let Value::Array(definitions) = load_document(&test_path)? else {
            return Err(invalid(&test_path, "test definitions must be a list"));
        };

        definitions
            .into_iter()
            .enumerate()
            .map(|(index, definition)| test_case_from(&test_path, index, definition))
            .collect()
    }
}

fn invalid(path: &Path, reason: impl Into<String>) -> DocumentError {
    DocumentError::Invalid {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn test_case_from(test_path: &Path, index: usize, definition: Value) -> Result<TestCase, DocumentError> {
    let Value::Object(mut definition) = definition else {
        return Err(invalid(test_path, format!("test case {index} is not a mapping")));
    };

    let job = match definition.remove("job") {
        Some(Value::Object(job)) => job,
        Some(Value::String(job_file)) => load_job(test_path, &job_file)?,
        Some(_) => {
            return Err(invalid(
                test_path,
                format!("test case {index} job must be a mapping or a path"),
            ));
        }
        None => return Err(invalid(test_path, format!("test case {index} has no job"))),
    };

    let outputs = match definition.remove("outputs") {
        Some(Value::Object(outputs)) => outputs,
        Some(_) | None => Map::new(),
    };

    Ok(TestCase {
        doc: definition
            .get("doc")
            .and_then(Value::as_str)
            .map(str::to_owned),
        job,
        outputs,
    })
}

/// Load a job document referenced by path, relative to the test definition file.
fn load_job(test_path: &Path, job_file: &str) -> Result<Map<String, Value>, DocumentError> {
    let job_path = test_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(job_file);
    match load_document(&job_path)? {
        Value::Object(job) => Ok(job),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            Err(invalid(&job_path, "job must be a mapping"))
        }
    }
}
