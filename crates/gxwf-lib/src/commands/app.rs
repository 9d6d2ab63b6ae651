use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::LintConfig;
use crate::infrastructure::engine_for;

use super::dockstore_init::DockstoreInitError;
use super::lint::{LintContext, LintError, lint_workflow_artifacts_on_paths};
use super::run::{RunError, RunRequest};

/// Errors that can occur during command orchestration
#[derive(Debug, Error)]
pub enum AppError {
    /// The lint command failed.
    #[error(transparent)]
    Lint(#[from] LintError),

    /// The dockstore-init command failed.
    #[error(transparent)]
    DockstoreInit(#[from] DockstoreInitError),

    /// The run command failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Run the lint command over every root in `paths` and print what was found.
///
/// Messages collected before a fatal failure are still printed.
///
/// # Errors
///
/// Returns [`AppError::Lint`] if a root is missing, a candidate workflow cannot be
/// parsed, or findings reach the configured fail level.
pub fn lint(paths: &[PathBuf], config: &LintConfig) -> Result<(), AppError> {
    let mut ctx = LintContext::new();
    let outcome = lint_workflow_artifacts_on_paths(&mut ctx, paths, config);
    ctx.print_messages();
    outcome?;
    ctx.verdict(config.fail_level)?;
    Ok(())
}

/// Run the dockstore-init command: write `.dockstore.yml` into `directory`.
///
/// # Errors
///
/// Returns [`AppError::DockstoreInit`] if the manifest cannot be generated or written.
pub fn dockstore_init(directory: &Path, force: bool) -> Result<(), AppError> {
    super::dockstore_init::run(directory, force)?;
    Ok(())
}

/// Run the run command on the engine selected for `request`.
///
/// # Errors
///
/// Returns [`AppError::Run`] if the engine is unavailable or cannot start, or
/// if any run result reports failure.
pub fn run(request: &RunRequest, output_directory: &Path) -> Result<(), AppError> {
    let kind = request.engine_kind();
    info!("Running {} with {kind}", request.path.display());
    let engine = engine_for(kind, output_directory).map_err(RunError::from)?;
    super::run::execute(request, engine.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Level, SKIP_TESTS, SkipSet};
    use crate::domain::EngineKind;
    use std::fs;

    fn workflow_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("wf.gxwf.yml"),
            "class: GalaxyWorkflow\noutputs:\n  out:\n    outputSource: cat/out_file1\nsteps: {}\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn missing_tests_fail_at_warn_level_only() {
        let dir = workflow_dir();
        let paths = vec![dir.path().to_path_buf()];

        assert!(matches!(
            lint(&paths, &LintConfig::default()),
            Err(AppError::Lint(LintError::ViolationsFound { errors: 0, warnings: 1 }))
        ));

        let config = LintConfig {
            fail_level: Level::Error,
            ..LintConfig::default()
        };
        assert!(lint(&paths, &config).is_ok());

        let config = LintConfig {
            skip: SkipSet::parse([SKIP_TESTS]),
            ..LintConfig::default()
        };
        assert!(lint(&paths, &config).is_ok());
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().join("missing")];
        assert!(matches!(
            lint(&paths, &LintConfig::default()),
            Err(AppError::Lint(LintError::Scan(_)))
        ));
    }

    #[test]
    fn galaxy_run_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = RunRequest::new("wf.gxwf.yml", Path::new("job.yml"));
        request.engine = Some(EngineKind::Galaxy);
        assert!(matches!(
            run(&request, dir.path()),
            Err(AppError::Run(RunError::Engine(_)))
        ));
    }
}
