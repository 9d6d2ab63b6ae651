use log::debug;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::{Engine, EngineError, EngineKind, RunResult};

/// Default cwltool executable, looked up on `PATH`.
const CWLTOOL_PROGRAM: &str = "cwltool";

/// Runs CWL tools and workflows through the `cwltool` reference runner.
#[derive(Debug, Clone)]
pub struct CwltoolEngine {
    program: PathBuf,
    output_directory: PathBuf,
}

impl CwltoolEngine {
    #[must_use]
    pub fn new(output_directory: &Path) -> Self {
        Self {
            program: PathBuf::from(CWLTOOL_PROGRAM),
            output_directory: output_directory.to_path_buf(),
        }
    }

    /// Use a different executable than `cwltool` from `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: &Path) -> Self {
        self.program = program.to_path_buf();
        self
    }
}

impl Engine for CwltoolEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Cwltool
    }

    fn run(&self, path: &Path, job_path: &Path) -> Result<Vec<RunResult>, EngineError> {
        debug!(
            "Running {} {} with {}",
            self.program.display(),
            path.display(),
            job_path.display()
        );
        let output = Command::new(&self.program)
            .arg("--outdir")
            .arg(&self.output_directory)
            .arg(path)
            .arg(job_path)
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let log = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Ok(vec![RunResult::failed(log)]);
        }

        // cwltool reports the output object as JSON on stdout.
        let outputs: Map<String, Value> =
            serde_json::from_slice(&output.stdout).map_err(|source| EngineError::Outputs {
                engine: self.kind(),
                source,
            })?;
        Ok(vec![RunResult::succeeded(outputs, log)])
    }
}

/// Build the engine for `kind`.
///
/// # Errors
///
/// Returns [`EngineError::Unavailable`] for Galaxy engines, which need a Galaxy
/// server this build does not manage.
pub fn engine_for(
    kind: EngineKind,
    output_directory: &Path,
) -> Result<Box<dyn Engine>, EngineError> {
    match kind {
        EngineKind::Cwltool => Ok(Box::new(CwltoolEngine::new(output_directory))),
        EngineKind::ExternalGalaxy | EngineKind::Galaxy => Err(EngineError::Unavailable {
            engine: kind,
            reason: "Galaxy execution is not supported by this build".to_owned(),
        }),
    }
}
