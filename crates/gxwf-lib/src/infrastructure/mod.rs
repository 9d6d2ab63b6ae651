pub mod config_file;
pub mod engine;
pub mod test_cases;
pub mod workflow;

pub use config_file::{CONFIG_FILE_NAME, ConfigFile, ConfigFileError, load_config_file, parse_config};
pub use engine::{CwltoolEngine, engine_for};
pub use test_cases::{FileTestCases, test_file_for};
pub use workflow::{
    EXCLUDE_WALK_DIRS, PotentialWorkflowFiles, ScanError, WorkflowDescriptions,
    find_potential_workflow_files, find_workflow_descriptions, is_potential_workflow_file,
    load_document, looks_like_a_workflow, parse_document,
};
