use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::EngineKind;
use crate::infrastructure::{CONFIG_FILE_NAME, ConfigFileError, load_config_file};

/// Check name that suppresses test-case linting.
pub const SKIP_TESTS: &str = "tests";

/// Check name that suppresses Dockstore manifest linting.
pub const SKIP_DOCKSTORE: &str = "dockstore";

/// Environment variable holding the external Galaxy server URL.
pub const GALAXY_URL_ENV: &str = "GXWF_GALAXY_URL";

/// Severity of a lint diagnostic, also used as the threshold that fails a lint run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    #[default]
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warn => f.write_str("warn"),
        }
    }
}

/// Error for a level name outside `error` and `warn`
#[derive(Debug, Error)]
#[error("unknown level `{0}`, expected `error` or `warn`")]
pub struct UnknownLevel(String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            other => Err(UnknownLevel(other.to_owned())),
        }
    }
}

/// Names of lint checks to suppress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct SkipSet(BTreeSet<String>);

impl SkipSet {
    /// Build from raw option values; each value may hold several comma-separated names.
    pub fn parse<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = values
            .into_iter()
            .flat_map(|value| {
                value
                    .as_ref()
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self(names)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add every name of `other` to this set.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl From<Vec<String>> for SkipSet {
    fn from(values: Vec<String>) -> Self {
        Self::parse(values)
    }
}

/// Options for the lint command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintConfig {
    /// Checks to suppress
    pub skip: SkipSet,
    /// Lowest severity that fails the run
    pub fail_level: Level,
}

/// Defaults for the run command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Engine to use when none is given on the command line
    pub engine: Option<EngineKind>,
    /// External Galaxy server URL
    pub galaxy_url: Option<String>,
}

/// Runtime settings loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// External Galaxy server URL
    pub galaxy_url: Option<String>,
}

impl Settings {
    /// Load settings from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            galaxy_url: env::var(GALAXY_URL_ENV).ok().filter(|url| !url.is_empty()),
        }
    }
}

/// All application configuration, loaded once at startup.
#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub lint: LintConfig,
    pub run: RunConfig,
    /// Path of the configuration file that was looked up
    pub config_path: PathBuf,
}

impl Config {
    /// Load all configuration: settings from env, lint and run defaults from
    /// `gxwf.toml` in `dir` if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError`] if the configuration file exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self, ConfigFileError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let file = load_config_file(&config_path)?;
        Ok(Self::from_parts(
            Settings::from_env(),
            file.lint,
            file.run,
            config_path,
        ))
    }

    /// Combine settings with file values. Environment settings take precedence.
    #[must_use]
    pub fn from_parts(
        settings: Settings,
        lint: LintConfig,
        mut run: RunConfig,
        config_path: PathBuf,
    ) -> Self {
        if settings.galaxy_url.is_some() {
            run.galaxy_url.clone_from(&settings.galaxy_url);
        }
        Self {
            settings,
            lint,
            run,
            config_path,
        }
    }
}
