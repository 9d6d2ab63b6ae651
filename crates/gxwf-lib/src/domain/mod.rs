pub mod dialect;
pub mod document;
pub mod dockstore;
pub mod inputs;
pub mod run;
pub mod test_case;

pub use dialect::{Dialect, FORMAT2_CLASS, NATIVE_MARKER, is_truthy};
pub use document::DocumentError;
pub use dockstore::{
    DOCKSTORE_REGISTRY_CONF, DOCKSTORE_REGISTRY_CONF_VERSION, DockstoreEntry, DockstoreManifest,
    RECOMMENDED_ENTRY_KEYS, REQUIRED_ENTRY_KEYS, resolve_reference,
};
pub use inputs::{InputLabels, input_labels};
pub use run::{Engine, EngineError, EngineKind, RunResult, select_engine};
pub use test_case::{TestCase, TestCaseProvider};
