use log::{debug, warn};
use serde_json::Value;
use serde_saphyr::DuplicateKeyPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::domain::{Dialect, DocumentError};

/// Directory names never descended into while looking for workflows.
pub const EXCLUDE_WALK_DIRS: [&str; 3] = [".hg", ".git", ".venv"];

/// File name suffixes of potential workflow artifacts.
const POTENTIAL_WORKFLOW_SUFFIXES: [&str; 3] = [".yml", ".yaml", ".ga"];

/// Errors that can occur when walking a directory for workflow files
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
}

/// Parse YAML or JSON text into an order-preserving value.
/// Empty documents parse to null. A repeated mapping key keeps its last value.
///
/// # Errors
///
/// Returns the parser error if the text is not well-formed.
pub fn parse_document(content: &str) -> Result<Value, serde_saphyr::Error> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    let options = serde_saphyr::options! {
        duplicate_keys: DuplicateKeyPolicy::LastWins,
    };
    serde_saphyr::from_str_with_options(content, options)
}

/// Read and parse a document from disk.
///
/// # Errors
///
/// Returns [`DocumentError::Read`] if the file cannot be read.
/// Returns [`DocumentError::Parse`] if the file is not well-formed YAML or JSON.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Whether a file name carries one of the workflow artifact suffixes.
#[must_use]
pub fn is_potential_workflow_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            POTENTIAL_WORKFLOW_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(suffix))
        })
}

/// Return whether the file at `path` is a workflow document.
///
/// Paths without a workflow suffix and documents that are not mappings are
/// not workflows. A document that does not parse is an error, not a `false`.
///
/// # Errors
///
/// Returns [`DocumentError`] if the file cannot be read or parsed.
pub fn looks_like_a_workflow(path: &Path) -> Result<bool, DocumentError> {
    if !is_potential_workflow_file(path) {
        return Ok(false);
    }
    let document = load_document(path)?;
    Ok(Dialect::classify(&document).is_workflow())
}

/// Whether the walk may enter or yield this entry. The root is always walked.
fn is_walkable(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry.file_type().is_dir()
        || !EXCLUDE_WALK_DIRS
            .iter()
            .any(|excluded| entry.file_name() == *excluded)
}

/// Lazy, depth-first walk yielding every potential workflow file under a root.
///
/// Entries of each directory are visited in file name order.
pub struct PotentialWorkflowFiles {
    entries: FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl Iterator for PotentialWorkflowFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.entries.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_dir() && is_potential_workflow_file(entry.path()) {
                        debug!("{}", entry.path().display());
                        return Some(entry.into_path());
                    }
                }
                Err(e) => warn!("Error reading path: {e}"),
            }
        }
    }
}

/// Find potential workflow files under `directory`, skipping excluded directories.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryNotFound`] if `directory` does not exist.
pub fn find_potential_workflow_files(directory: &Path) -> Result<PotentialWorkflowFiles, ScanError> {
    if !directory.exists() {
        return Err(ScanError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }
    debug!("Scanning {} for workflow files...", directory.display());
    let entries = WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_walkable as fn(&DirEntry) -> bool);
    Ok(PotentialWorkflowFiles { entries })
}

/// Lazy sequence of workflow documents under a root, in walk order.
pub struct WorkflowDescriptions {
    candidates: PotentialWorkflowFiles,
}

impl Iterator for WorkflowDescriptions {
    type Item = Result<PathBuf, DocumentError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = self.candidates.next()?;
            match looks_like_a_workflow(&candidate) {
                Ok(true) => return Some(Ok(candidate)),
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Find the workflow documents under `directory`.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryNotFound`] if `directory` does not exist.
/// Each yielded item fails if its candidate file cannot be parsed.
pub fn find_workflow_descriptions(directory: &Path) -> Result<WorkflowDescriptions, ScanError> {
    Ok(WorkflowDescriptions {
        candidates: find_potential_workflow_files(directory)?,
    })
}
