pub mod board;
pub mod bounds;
pub mod completions;
pub mod members;
pub mod plot;
pub mod stats;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use flightdeck_core::config::ProjectConfig;
use flightdeck_core::{ErrorCode, Snapshot};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// Snapshot source shared by every read command.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Tracker export: a JSON array of tickets or `{ "tickets": [...] }`.
    #[arg(long, short = 's', value_name = "FILE")]
    pub snapshot: PathBuf,
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputMode,
    pub project: ProjectConfig,
    /// Identity for "my tickets", already resolved from flag, env and config.
    pub login: Option<String>,
}

/// Read and validate a snapshot, reporting failures in the output mode.
pub fn load_snapshot(path: &Path, output: OutputMode) -> anyhow::Result<Snapshot> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            let code = ErrorCode::SnapshotNotFound;
            render_error(
                output,
                &CliError::with_details(
                    format!("cannot open snapshot {}: {err}", path.display()),
                    code.hint().unwrap_or(code.message()),
                    code.code(),
                ),
            )?;
            return Err(err).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    match Snapshot::from_reader(BufReader::new(file)) {
        Ok(snapshot) => {
            debug!(path = %path.display(), tickets = snapshot.len(), "snapshot loaded");
            Ok(snapshot)
        }
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Err(err).with_context(|| format!("Failed to load {}", path.display()))
        }
    }
}
