//! git-pair core library.
//!
//! This crate provides the pieces behind `git pair` and `git pair-commit`:
//! the pairs file model and loader, the pair resolution engine, git config
//! access, and commit invocation.

pub mod config;
pub mod errors;
pub mod git;
pub mod pair_update;
pub mod pairing;

// Re-exports for convenience.
pub use config::PairsConfig;
pub use errors::{ConfigError, CoreError, GitError, PairError};
pub use git::{ConfigStore, Git2ConfigStore, GitCommit};
pub use pair_update::{PairSettings, PairUpdate};
