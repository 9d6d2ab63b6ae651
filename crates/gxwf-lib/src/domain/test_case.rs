use serde_json::{Map, Value};
use std::path::Path;

use super::DocumentError;

/// A workflow test case: the job inputs plus the outputs it expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase {
    /// Optional free-text description
    pub doc: Option<String>,
    /// Job inputs keyed by workflow input label
    pub job: Map<String, Value>,
    /// Expected outputs keyed by workflow output label
    pub outputs: Map<String, Value>,
}

impl TestCase {
    #[must_use]
    pub fn new(job: Map<String, Value>) -> Self {
        Self {
            job,
            ..Self::default()
        }
    }

    /// Keys of the job mapping, in file order.
    #[must_use]
    pub fn job_keys(&self) -> Vec<&str> {
        self.job.keys().map(String::as_str).collect()
    }
}

/// Trait for finding the test cases that accompany a workflow
pub trait TestCaseProvider {
    /// Return the test cases for the workflow at `workflow_path`.
    /// A workflow without a test definition file has no test cases.
    ///
    /// # Errors
    ///
    /// Returns an error if a test definition or job file cannot be read or is malformed.
    fn cases(&self, workflow_path: &Path) -> Result<Vec<TestCase>, DocumentError>;
}
