use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name of the Dockstore registry manifest.
pub const DOCKSTORE_REGISTRY_CONF: &str = ".dockstore.yml";

/// Manifest version written by the generator.
pub const DOCKSTORE_REGISTRY_CONF_VERSION: &str = "1.2";

/// Keys every manifest workflow entry must carry.
pub const REQUIRED_ENTRY_KEYS: [&str; 2] = ["primaryDescriptorPath", "subclass"];

/// Keys a manifest workflow entry should carry.
pub const RECOMMENDED_ENTRY_KEYS: [&str; 1] = ["testParameterFiles"];

/// Subclass used for every generated entry. CWL workflows are not generated yet.
const GALAXY_SUBCLASS: &str = "Galaxy";

/// One registrable workflow in a Dockstore manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockstoreEntry {
    pub subclass: String,
    pub primary_descriptor_path: String,
    pub test_parameter_files: Vec<String>,
}

impl DockstoreEntry {
    /// Entry for a Galaxy workflow at a root-relative descriptor path.
    #[must_use]
    pub fn galaxy(primary_descriptor_path: String) -> Self {
        Self {
            subclass: GALAXY_SUBCLASS.to_owned(),
            primary_descriptor_path,
            test_parameter_files: Vec::new(),
        }
    }
}

/// The `.dockstore.yml` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockstoreManifest {
    pub workflows: Vec<DockstoreEntry>,
}

impl DockstoreManifest {
    /// Render the manifest as YAML.
    ///
    /// The version line is written first by hand; `version` must lead the file
    /// and a generic map serializer gives no ordering guarantee.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("version: {DOCKSTORE_REGISTRY_CONF_VERSION}\n");
        if self.workflows.is_empty() {
            out.push_str("workflows: []\n");
            return out;
        }

        out.push_str("workflows:\n");
        for entry in &self.workflows {
            let _ = writeln!(
                out,
                "- primaryDescriptorPath: {}",
                quote(&entry.primary_descriptor_path)
            );
            let _ = writeln!(out, "  subclass: {}", quote(&entry.subclass));
            if !entry.test_parameter_files.is_empty() {
                out.push_str("  testParameterFiles:\n");
                for file in &entry.test_parameter_files {
                    let _ = writeln!(out, "  - {}", quote(file));
                }
            }
        }
        out
    }

    /// Rebuild a manifest from a parsed document, ignoring entries that do not
    /// carry the required keys as strings.
    #[must_use]
    pub fn from_document(document: &Value) -> Option<Self> {
        let entries = document.get("workflows")?.as_array()?;
        let workflows = entries
            .iter()
            .filter_map(|entry| {
                Some(DockstoreEntry {
                    subclass: entry.get("subclass")?.as_str()?.to_owned(),
                    primary_descriptor_path: entry
                        .get("primaryDescriptorPath")?
                        .as_str()?
                        .to_owned(),
                    test_parameter_files: entry
                        .get("testParameterFiles")
                        .and_then(Value::as_array)
                        .map(|files| {
                            files
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_owned)
                                .collect()
                        })
                        .unwrap_or_default(),
                })
            })
            .collect();
        Some(Self { workflows })
    }
}

/// JSON string literals are valid double-quoted YAML scalars.
fn quote(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}

/// Resolve a path referenced from a manifest against the manifest's directory.
///
/// Referenced paths are written root-relative with a leading `/`. Exactly one
/// character is dropped before joining, whatever it is: a reference written
/// without the leading slash loses its first character.
#[must_use]
pub fn resolve_reference(directory: &Path, referenced: &str) -> PathBuf {
    let mut chars = referenced.chars();
    chars.next();
    directory.join(chars.as_str())
}
