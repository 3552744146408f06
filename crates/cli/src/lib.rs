//! git-pair command-line tools.
//!
//! Shared code for the `git-pair` and `git-pair-commit` binaries. Both are
//! thin wrappers: parse arguments, load the pairs file, call into
//! `gitpair_core`, print, and map errors to an exit status.

pub mod commit;
pub mod pair;
pub mod style;

use std::process::ExitCode;

use anyhow::{Context, Result};
use git2::Repository;
use tracing_subscriber::EnvFilter;

use gitpair_core::{ConfigError, CoreError, GitError, PairError, PairsConfig};

/// Environment variable holding the log filter, e.g. `debug`.
pub const LOG_ENV: &str = "GIT_PAIR_LOG";

/// Minimal logging for the CLI, on stderr so it never mixes with output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// The repository and pairs file for the current directory.
pub struct Workspace {
    pub repo: Repository,
    pub config: PairsConfig,
}

impl Workspace {
    /// Discover the repository and nearest pairs file from the current
    /// directory, falling back to the home directory for the pairs file.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let repo = Repository::discover(&cwd)
            .map_err(|_| GitError::RepositoryNotFound(cwd.display().to_string()))?;
        let home = dirs::home_dir();
        let config = PairsConfig::load_nearest(&cwd, home.as_deref())?;
        Ok(Self { repo, config })
    }
}

/// Text shown for a failed run. Engine and lookup errors are shown as-is;
/// everything else carries its context chain.
pub fn error_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<PairError>() {
        return e.to_string();
    }
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::Pair(e)) => return e.to_string(),
        Some(CoreError::Config(e @ ConfigError::NotFound(_))) => return e.to_string(),
        _ => {}
    }
    if let Some(e @ ConfigError::NotFound(_)) = err.downcast_ref::<ConfigError>() {
        return e.to_string();
    }
    format!("Error: {:#}", err)
}

/// Print the error and turn it into a failing exit status.
pub fn fail(err: anyhow::Error) -> ExitCode {
    eprintln!("{}", style::error(&error_message(&err)));
    ExitCode::FAILURE
}
