use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Level, LintConfig, SKIP_DOCKSTORE};
use crate::domain::{DOCKSTORE_REGISTRY_CONF, DocumentError, TestCaseProvider};
use crate::infrastructure::{
    FileTestCases, ScanError, find_potential_workflow_files, looks_like_a_workflow,
};

/// Errors that can occur during the lint command
#[derive(Debug, Error)]
pub enum LintError {
    /// A lint root could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A candidate workflow could not be parsed, so it could not even be classified.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Lint violations were found at or above the configured fail level.
    #[error("{errors} error(s) and {warnings} warning(s) found")]
    ViolationsFound { errors: usize, warnings: usize },
}

/// A single finding recorded during linting.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    /// Severity level
    pub level: Level,
    /// Human-readable message
    pub message: String,
    /// File the finding is about, if any
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            path: None,
        }
    }

    /// Set the path field.
    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }
}

/// Accumulates every diagnostic of one lint invocation.
#[derive(Debug, Default)]
pub struct LintContext {
    found_errors: bool,
    found_warns: bool,
    diagnostics: Vec<Diagnostic>,
}

impl LintContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, message: impl Into<String>, path: Option<&Path>) {
        self.found_errors = true;
        self.push(Diagnostic::new(Level::Error, message), path);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>, path: Option<&Path>) {
        self.found_warns = true;
        self.push(Diagnostic::new(Level::Warn, message), path);
    }

    fn push(&mut self, diagnostic: Diagnostic, path: Option<&Path>) {
        let diagnostic = match path {
            Some(path) => diagnostic.with_path(path),
            None => diagnostic,
        };
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn found_errors(&self) -> bool {
        self.found_errors
    }

    #[must_use]
    pub fn found_warns(&self) -> bool {
        self.found_warns
    }

    /// All diagnostics in insertion order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of one level, in insertion order.
    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.level == level)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.at_level(Level::Error).count()
    }

    #[must_use]
    pub fn warn_count(&self) -> usize {
        self.at_level(Level::Warn).count()
    }

    /// Append everything another context recorded, keeping its order.
    pub fn merge(&mut self, other: Self) {
        self.found_errors |= other.found_errors;
        self.found_warns |= other.found_warns;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Log all diagnostics: errors first, then warnings, each in insertion order.
    pub fn print_messages(&self) {
        if self.diagnostics.is_empty() {
            info!("No lint issues found.");
            return;
        }

        for diag in self
            .at_level(Level::Error)
            .chain(self.at_level(Level::Warn))
        {
            let level_str = match diag.level {
                Level::Error => "[error]",
                Level::Warn => "[warn]",
            };
            let location = diag
                .path
                .as_ref()
                .map(|p| format!("{}: ", p.display()))
                .unwrap_or_default();
            info!("{level_str} {location}{}", diag.message);
        }

        let error_count = self.error_count();
        let warn_count = self.warn_count();
        info!(
            "{} issue(s) ({} error{}, {} warning{})",
            self.diagnostics.len(),
            error_count,
            if error_count == 1 { "" } else { "s" },
            warn_count,
            if warn_count == 1 { "" } else { "s" }
        );
    }

    /// The final verdict: success iff nothing at or above `fail_level` was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::ViolationsFound`] when the run fails.
    pub fn verdict(&self, fail_level: Level) -> Result<(), LintError> {
        let failed = match fail_level {
            Level::Error => self.found_errors,
            Level::Warn => self.found_errors || self.found_warns,
        };
        if failed {
            return Err(LintError::ViolationsFound {
                errors: self.error_count(),
                warnings: self.warn_count(),
            });
        }
        Ok(())
    }
}

/// Lint every workflow artifact under each of `paths`, recording findings in `ctx`.
///
/// Findings already recorded stay in `ctx` when a later root fails.
///
/// # Errors
///
/// Returns [`LintError::Scan`] if a root does not exist.
/// Returns [`LintError::Document`] if a candidate workflow file cannot be parsed.
pub fn lint_workflow_artifacts_on_paths(
    ctx: &mut LintContext,
    paths: &[PathBuf],
    config: &LintConfig,
) -> Result<(), LintError> {
    for path in paths {
        lint_workflow_artifacts_on_path(ctx, path, config, &FileTestCases)?;
    }
    Ok(())
}

/// Lint the workflow artifacts under one root with the given test case source.
///
/// # Errors
///
/// Returns [`LintError::Scan`] if `root` does not exist.
/// Returns [`LintError::Document`] if a candidate workflow file cannot be parsed.
pub fn lint_workflow_artifacts_on_path<P: TestCaseProvider>(
    ctx: &mut LintContext,
    root: &Path,
    config: &LintConfig,
    provider: &P,
) -> Result<(), LintError> {
    for candidate in find_potential_workflow_files(root)? {
        if candidate
            .file_name()
            .is_some_and(|name| name == DOCKSTORE_REGISTRY_CONF)
        {
            if !config.skip.contains(SKIP_DOCKSTORE) {
                dockstore::lint_dockstore_config(ctx, &candidate);
            }
        } else if looks_like_a_workflow(&candidate)? {
            workflow::lint_workflow(ctx, &candidate, config, provider)?;
        }
    }
    Ok(())
}

// Check implementations
pub mod dockstore;
mod format2;
mod native;
pub mod structure;
pub mod workflow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_can_be_created() {
        let diag = Diagnostic::new(Level::Error, "test message");
        assert_eq!(diag.level, Level::Error);
        assert_eq!(diag.message, "test message");
        assert!(diag.path.is_none());
    }

    #[test]
    fn diagnostic_with_path() {
        let diag = Diagnostic::new(Level::Warn, "test").with_path(Path::new("wf.ga"));
        assert_eq!(diag.path, Some(PathBuf::from("wf.ga")));
    }

    #[test]
    fn context_tracks_flags_and_counts() {
        let mut ctx = LintContext::new();
        assert!(!ctx.found_errors() && !ctx.found_warns());

        ctx.warn("first warning", None);
        ctx.error("an error", Some(Path::new("a.ga")));
        ctx.warn("second warning", Some(Path::new("b.ga")));

        assert!(ctx.found_errors());
        assert!(ctx.found_warns());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warn_count(), 2);
        let warnings: Vec<_> = ctx.at_level(Level::Warn).map(|d| d.message.as_str()).collect();
        assert_eq!(warnings, vec!["first warning", "second warning"]);
    }

    #[test]
    fn verdict_respects_fail_level() {
        let mut ctx = LintContext::new();
        assert!(ctx.verdict(Level::Warn).is_ok());

        ctx.warn("only a warning", None);
        assert!(ctx.verdict(Level::Error).is_ok());
        assert!(matches!(
            ctx.verdict(Level::Warn),
            Err(LintError::ViolationsFound {
                errors: 0,
                warnings: 1
            })
        ));

        ctx.error("now an error", None);
        assert!(ctx.verdict(Level::Error).is_err());
    }

    #[test]
    fn merge_keeps_order_and_flags() {
        let mut first = LintContext::new();
        first.warn("a", None);
        let mut second = LintContext::new();
        second.error("b", None);
        second.warn("c", None);

        first.merge(second);
        let messages: Vec<_> = first.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
        assert!(first.found_errors());
    }
}
