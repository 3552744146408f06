//! `git pair-commit`: commit as the current pair.

use std::process::ExitCode;

use clap::Parser;

use gitpair_cli::commit::{run_commit, CommitArgs};

#[tokio::main]
async fn main() -> ExitCode {
    gitpair_cli::init_logging();

    let args = CommitArgs::parse();

    match run_commit(args).await {
        Ok(code) => code,
        Err(e) => gitpair_cli::fail(e),
    }
}
