use serde_json::{Map, Value};
use std::path::Path;

use super::LintContext;
use super::format2::Format2Linter;
use super::native::NativeLinter;
use crate::domain::Dialect;

/// Trait for a dialect-specific structural check of a workflow document.
pub trait StructuralLinter {
    /// Returns the dialect name this linter checks (e.g., "format2")
    fn name(&self) -> &'static str;

    /// Check the document's shape, recording findings tagged with `path`.
    fn lint(&self, ctx: &mut LintContext, document: &Map<String, Value>, path: &Path);
}

/// The structural linter for a dialect. Documents of unknown dialect are
/// checked as native exports.
#[must_use]
pub fn for_dialect(dialect: Dialect) -> &'static dyn StructuralLinter {
    match dialect {
        Dialect::Format2 => &Format2Linter,
        Dialect::Native | Dialect::Unknown => &NativeLinter,
    }
}

/// What a linter saw of a workflow's declared outputs.
#[derive(Debug, Default)]
pub(super) struct OutputScan {
    pub(super) found_outputs: bool,
    pub(super) found_output_without_label: bool,
}

impl OutputScan {
    pub(super) fn record(&mut self, labelled: bool) {
        self.found_outputs = true;
        if !labelled {
            self.found_output_without_label = true;
        }
    }

    pub(super) fn report(&self, ctx: &mut LintContext, path: &Path) {
        if !self.found_outputs {
            ctx.warn("Workflow contained no outputs", Some(path));
        }
        if self.found_output_without_label {
            ctx.warn("Workflow contained output without a label", Some(path));
        }
    }
}
