//! Error types for the git-pair core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Pair(#[from] PairError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),
}

// ---------------------------------------------------------------------------
// Pair resolution errors
// ---------------------------------------------------------------------------

/// Business-rule failures raised by the pair resolution engine.
///
/// Messages are shown to the user verbatim, so they name the offending
/// input and say how to fix it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairError {
    /// Requested initials have no entry under `pairs`.
    #[error(
        "Couldn't find author name for initials: {0}. Add this person to the .pairs file in your project or home directory."
    )]
    UnknownInitials(String),

    /// Commit mode was asked to credit an author but no pair is set.
    #[error("Error: No pair set. Please set your pair with `git pair ...`")]
    NoPairSet,

    /// Required wiring was not supplied to a use case.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// Commit mode has no way to build an address for the credited author.
    #[error(
        "Couldn't determine email address for initials: {0}. Add an email domain or an email_addresses entry to the .pairs file."
    )]
    NoEmailDomain(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from locating, loading and validating the pairs file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No pairs file in any candidate directory.
    #[error("Could not find a .pairs file. Create a YAML file in your project or home directory.\n{0}")]
    NotFound(String),

    /// A specific pairs file path does not exist.
    #[error("pairs file not found: {0}")]
    FileNotFound(String),

    /// YAML / TOML parse error.
    #[error("pairs file parse error in '{path}': {detail}")]
    ParseError { path: String, detail: String },

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the pairs file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from git config access and commit invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The working directory is not inside a git repository.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// The `git` binary could not be started.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// Generic I/O wrapper.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
