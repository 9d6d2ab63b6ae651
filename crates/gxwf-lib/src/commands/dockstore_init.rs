use log::{debug, info};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::domain::{DOCKSTORE_REGISTRY_CONF, DockstoreEntry, DockstoreManifest, DocumentError};
use crate::infrastructure::{ScanError, find_workflow_descriptions};

/// Errors that can occur while generating a Dockstore manifest
#[derive(Debug, Error)]
pub enum DockstoreInitError {
    #[error("{} already exists, use --force to overwrite", path.display())]
    AlreadyExists { path: PathBuf },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to write Dockstore manifest: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the manifest for every workflow document found under `directory`.
///
/// Each entry points at its workflow as `/<path relative to directory>` with
/// forward slashes. Only Galaxy workflows are listed.
///
/// # Errors
///
/// Returns [`DockstoreInitError::Scan`] if `directory` does not exist.
/// Returns [`DockstoreInitError::Document`] if a candidate workflow cannot be parsed.
pub fn generate_dockstore_manifest(directory: &Path) -> Result<DockstoreManifest, DockstoreInitError> {
    let mut manifest = DockstoreManifest::default();
    for workflow in find_workflow_descriptions(directory)? {
        let workflow = workflow?;
        let descriptor_path = descriptor_path(directory, &workflow);
        debug!("Registering {descriptor_path}");
        manifest.workflows.push(DockstoreEntry::galaxy(descriptor_path));
    }
    Ok(manifest)
}

/// Render the manifest for `directory` as `.dockstore.yml` content.
///
/// # Errors
///
/// See [`generate_dockstore_manifest`].
pub fn generate_dockstore_yaml(directory: &Path) -> Result<String, DockstoreInitError> {
    Ok(generate_dockstore_manifest(directory)?.render())
}

/// Write `directory/.dockstore.yml`, refusing to replace an existing one unless `force`.
///
/// # Errors
///
/// Returns [`DockstoreInitError::AlreadyExists`] if the manifest exists and `force` is off.
/// Returns [`DockstoreInitError::Write`] if the manifest cannot be written.
/// Propagates scan and parse failures from [`generate_dockstore_manifest`].
pub fn run(directory: &Path, force: bool) -> Result<PathBuf, DockstoreInitError> {
    let path = directory.join(DOCKSTORE_REGISTRY_CONF);
    if path.exists() && !force {
        return Err(DockstoreInitError::AlreadyExists { path });
    }

    let manifest = generate_dockstore_manifest(directory)?;
    fs::write(&path, manifest.render()).map_err(|source| DockstoreInitError::Write {
        path: path.clone(),
        source,
    })?;
    info!(
        "Wrote {} with {} workflow(s)",
        path.display(),
        manifest.workflows.len()
    );
    Ok(path)
}

fn descriptor_path(directory: &Path, workflow: &Path) -> String {
    let relative = workflow.strip_prefix(directory).unwrap_or(workflow);
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::Prefix(_)
            | Component::RootDir
            | Component::CurDir
            | Component::ParentDir => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}
