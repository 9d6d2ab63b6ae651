use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Level, LintConfig, RunConfig, SkipSet};
use crate::domain::EngineKind;

pub const CONFIG_FILE_NAME: &str = "gxwf.toml";

/// Errors that can occur when reading the configuration file
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

// ---- TOML wire types ----

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLint {
    #[serde(default)]
    skip: SkipSet,
    #[serde(default)]
    fail_level: Level,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRun {
    engine: Option<EngineKind>,
    galaxy_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigData {
    #[serde(default)]
    lint: TomlLint,
    #[serde(default)]
    run: TomlRun,
}

/// Lint and run defaults read from `gxwf.toml`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub lint: LintConfig,
    pub run: RunConfig,
}

/// Parse configuration file contents.
///
/// # Errors
///
/// Returns the TOML error if the contents are malformed or carry unknown keys.
pub fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    let data: ConfigData = toml::from_str(content)?;
    Ok(ConfigFile {
        lint: LintConfig {
            skip: data.lint.skip,
            fail_level: data.lint.fail_level,
        },
        run: RunConfig {
            engine: data.run.engine,
            galaxy_url: data.run.galaxy_url.filter(|url| !url.is_empty()),
        },
    })
}

/// Load the configuration file. Returns defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigFileError::Read`] if the file exists but cannot be read.
/// Returns [`ConfigFileError::Parse`] if the file is not valid configuration.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}
