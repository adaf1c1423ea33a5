use clap::Parser;
use kcidb_submitter::{
    config::DEFAULT_VERSION_FILE, submit_kcidb, ConfigError, Settings, SubmissionFailed,
    Submitter,
};
use log::{error, info};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};
use thiserror::Error;

// Submit a JSON array of KCIDB records. Settings come from DEBUG,
// KCIDB_SUBMIT_URL, KCIDB_TOKEN and KCIDB_STRICT_STATUS.
#[derive(Debug, Parser)]
#[command(name = "kcidb_submitter", version, about)]
struct Args {
    /// Version file holding the [kcidb] major/minor table
    #[arg(long, env = "KCIDB_VERSION_FILE", default_value = DEFAULT_VERSION_FILE)]
    config: PathBuf,

    /// File with a JSON array of test or build records
    records: PathBuf,
}

#[derive(Debug, Error)]
enum RunError {
    // Version file or settings unusable
    #[error("error loading configuration: {0}")]
    Config(#[from] ConfigError),
    // Records file missing or unreadable
    #[error("error reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    // Records file is not a JSON array
    #[error("error parsing {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: {}", .0, .0.cause())]
    Submit(#[from] SubmissionFailed),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match Settings::from_env() {
        Ok(settings) => run(&args, settings).await,
        Err(e) => Err(RunError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, settings: Settings) -> Result<(), RunError> {
    // Nothing can be submitted without the version file and settings
    let submitter = Submitter::with_settings(&args.config, settings)?;
    let version = submitter.version();
    info!(
        "Using KCIDB schema {}.{} from {}",
        version.major,
        version.minor,
        args.config.display()
    );

    let records = read_records(&args.records)?;
    submit_kcidb(&submitter, &records).await?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<Value>, RunError> {
    let contents = fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RunError::Parse {
        path: path.display().to_string(),
        source,
    })
}
