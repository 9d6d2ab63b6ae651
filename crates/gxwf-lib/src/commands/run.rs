use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::RunConfig;
use crate::domain::{Engine, EngineError, EngineKind, RunResult, select_engine};

/// Errors that can occur during the run command
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// At least one engine result reported failure.
    #[error("{failed} of {total} run(s) failed")]
    Failed { failed: usize, total: usize },

    #[error("failed to serialize run outputs")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write run outputs: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single run invocation, with command-line values already merged over config.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub path: PathBuf,
    pub job_path: PathBuf,
    pub engine: Option<EngineKind>,
    pub galaxy_url: Option<String>,
    pub output_json: Option<PathBuf>,
}

impl RunRequest {
    /// Build a request from a tool or workflow URI. A `file://` prefix is dropped.
    #[must_use]
    pub fn new(uri: &str, job_path: &Path) -> Self {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        Self {
            path: PathBuf::from(path),
            job_path: job_path.to_path_buf(),
            engine: None,
            galaxy_url: None,
            output_json: None,
        }
    }

    /// Fill engine and Galaxy URL from `config` where the request leaves them unset.
    #[must_use]
    pub fn with_defaults(mut self, config: &RunConfig) -> Self {
        self.engine = self.engine.or(config.engine);
        if self.galaxy_url.is_none() {
            self.galaxy_url.clone_from(&config.galaxy_url);
        }
        self
    }

    /// The engine this request runs on.
    #[must_use]
    pub fn engine_kind(&self) -> EngineKind {
        select_engine(&self.path, self.engine, self.galaxy_url.as_deref())
    }
}

/// Run `request` on `engine` and write the outputs of the last result to
/// `request.output_json` if set.
///
/// # Errors
///
/// Returns [`RunError::Engine`] if the engine cannot run at all.
/// Returns [`RunError::Failed`] if any result reports failure; nothing is written then.
/// Returns [`RunError::Write`] if the outputs file cannot be written.
pub fn execute<E: Engine + ?Sized>(
    request: &RunRequest,
    engine: &E,
) -> Result<Vec<RunResult>, RunError> {
    debug!(
        "Running {} on {}",
        request.path.display(),
        engine.kind()
    );
    let results = engine.run(&request.path, &request.job_path)?;

    let failed: Vec<_> = results.iter().filter(|r| !r.successful).collect();
    if !failed.is_empty() {
        for result in &failed {
            warn!("Run failed [{result}]");
        }
        return Err(RunError::Failed {
            failed: failed.len(),
            total: results.len(),
        });
    }

    if let (Some(output_json), Some(last)) = (&request.output_json, results.last()) {
        let content = serde_json::to_string_pretty(&last.outputs).map_err(RunError::Serialize)?;
        fs::write(output_json, content).map_err(|source| RunError::Write {
            path: output_json.clone(),
            source,
        })?;
        info!("Run outputs written to {}", output_json.display());
    }
    Ok(results)
}
