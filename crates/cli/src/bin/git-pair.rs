//! `git pair`: configure git authors when pair programming.

use std::process::ExitCode;

use clap::Parser;

use gitpair_cli::pair::{run_pair, PairArgs};

fn main() -> ExitCode {
    gitpair_cli::init_logging();

    let args = PairArgs::parse();

    match run_pair(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => gitpair_cli::fail(e),
    }
}
