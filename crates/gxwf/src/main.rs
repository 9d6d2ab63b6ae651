use clap::{Parser, Subcommand};
use gxwf_lib::commands;
use gxwf_lib::commands::app::AppError;
use gxwf_lib::commands::run::RunRequest;
use gxwf_lib::config::{Config, Level, SkipSet};
use gxwf_lib::domain::EngineKind;
use gxwf_lib::infrastructure::ConfigFileError;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the gxwf CLI binary
#[derive(Debug, Error)]
enum GxwfError {
    /// Command orchestration failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigFileError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(name = "gxwf")]
#[command(about = "Lint Galaxy workflows, their test jobs and Dockstore manifests", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint workflows, their test jobs and .dockstore.yml manifests
    Lint {
        /// Directories to scan
        #[arg(value_name = "PATH", default_value = ".")]
        paths: Vec<PathBuf>,

        /// Checks to skip (tests, dockstore); repeatable or comma-separated
        #[arg(long, value_name = "NAME")]
        skip: Vec<String>,

        /// Lowest severity that fails the run (warn or error)
        #[arg(long, value_name = "LEVEL")]
        fail_level: Option<Level>,
    },
    /// Write a .dockstore.yml listing every workflow in a directory
    DockstoreInit {
        /// Repository root to scan
        #[arg(value_name = "DIR", default_value = ".")]
        directory: PathBuf,

        /// Overwrite an existing .dockstore.yml
        #[arg(long)]
        force: bool,
    },
    /// Run a tool or workflow against a job file
    Run {
        /// Tool or workflow path, optionally prefixed with file://
        #[arg(value_name = "URI")]
        uri: String,

        /// Job file with the inputs
        #[arg(value_name = "JOB")]
        job_path: PathBuf,

        /// Execution engine (cwltool, external_galaxy, galaxy)
        #[arg(long)]
        engine: Option<EngineKind>,

        /// External Galaxy server URL
        #[arg(long, value_name = "URL")]
        galaxy_url: Option<String>,

        /// Write the outputs of a successful run to this file as JSON
        #[arg(long, value_name = "PATH")]
        output_json: Option<PathBuf>,

        /// Directory the engine writes outputs to
        #[arg(long, value_name = "DIR", default_value = ".")]
        output_directory: PathBuf,
    },
}

fn main() -> Result<(), GxwfError> {
    let cli = Cli::parse();

    init_logging(&cli);

    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    match cli.command {
        Commands::Lint {
            paths,
            skip,
            fail_level,
        } => {
            let mut lint_config = config.lint;
            lint_config.skip.merge(SkipSet::parse(skip));
            if let Some(fail_level) = fail_level {
                lint_config.fail_level = fail_level;
            }
            commands::app::lint(&paths, &lint_config)?;
        }
        Commands::DockstoreInit { directory, force } => {
            commands::app::dockstore_init(&directory, force)?;
        }
        Commands::Run {
            uri,
            job_path,
            engine,
            galaxy_url,
            output_json,
            output_directory,
        } => {
            let mut request = RunRequest::new(&uri, &job_path);
            request.engine = engine;
            request.galaxy_url = galaxy_url;
            request.output_json = output_json;
            let request = request.with_defaults(&config.run);
            commands::app::run(&request, &output_directory)?;
        }
    }
    Ok(())
}

/// Initialize logging based on the verbosity level specified in the CLI
fn init_logging(cli: &Cli) {
    let mut builder = env_logger::builder();
    builder
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format(|buf, record| {
            let level = record.level();
            let style = &buf.default_level_style(level);
            writeln!(buf, "[{style}{level}{style:#}] {}", record.args())
        });

    if !cli.verbose {
        builder.format_timestamp(None);
    }

    builder.init();
}
