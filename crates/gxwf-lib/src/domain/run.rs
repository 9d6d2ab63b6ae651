use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Execution backends a tool or workflow can be run through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Cwltool,
    ExternalGalaxy,
    Galaxy,
}

impl EngineKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cwltool => "cwltool",
            Self::ExternalGalaxy => "external_galaxy",
            Self::Galaxy => "galaxy",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an engine name outside the known set
#[derive(Debug, Error)]
#[error("unknown engine `{0}`, expected one of: cwltool, external_galaxy, galaxy")]
pub struct UnknownEngine(String);

impl FromStr for EngineKind {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cwltool" => Ok(Self::Cwltool),
            "external_galaxy" => Ok(Self::ExternalGalaxy),
            "galaxy" => Ok(Self::Galaxy),
            other => Err(UnknownEngine(other.to_owned())),
        }
    }
}

/// Pick the engine for a run: an explicit choice wins, then CWL files go to
/// cwltool, then a configured Galaxy URL selects the external server.
#[must_use]
pub fn select_engine(
    path: &Path,
    explicit: Option<EngineKind>,
    galaxy_url: Option<&str>,
) -> EngineKind {
    if let Some(kind) = explicit {
        return kind;
    }
    if path.extension().is_some_and(|ext| ext == "cwl") {
        EngineKind::Cwltool
    } else if galaxy_url.is_some_and(|url| !url.is_empty()) {
        EngineKind::ExternalGalaxy
    } else {
        EngineKind::Galaxy
    }
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResult {
    pub successful: bool,
    /// Output name to output description, as reported by the engine
    pub outputs: Map<String, Value>,
    /// Captured engine log
    pub log: String,
}

impl RunResult {
    #[must_use]
    pub fn succeeded(outputs: Map<String, Value>, log: String) -> Self {
        Self {
            successful: true,
            outputs,
            log,
        }
    }

    #[must_use]
    pub fn failed(log: String) -> Self {
        Self {
            successful: false,
            outputs: Map::new(),
            log,
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.successful { "ok" } else { "failed" };
        write!(f, "{status}: {}", self.log.trim())
    }
}

/// Errors raised by an execution engine before it produces a result
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine {engine} is not available: {reason}")]
    Unavailable { engine: EngineKind, reason: String },

    #[error("failed to start {program}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse outputs reported by {engine}")]
    Outputs {
        engine: EngineKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for executing a tool or workflow against a job file
pub trait Engine {
    fn kind(&self) -> EngineKind;

    /// Run the artifact at `path` with the job at `job_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be started or its report cannot be read.
    /// A run that starts but fails is reported as an unsuccessful [`RunResult`].
    fn run(&self, path: &Path, job_path: &Path) -> Result<Vec<RunResult>, EngineError>;
}
