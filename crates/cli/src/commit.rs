//! `git pair-commit`: commit with a randomly credited pair member.

use std::process::{ExitCode, ExitStatus};

use anyhow::{Context, Result};
use clap::Parser;

use gitpair_core::git::{stored_initials, Git2ConfigStore};
use gitpair_core::pairing::compose_commit_identity;
use gitpair_core::GitCommit;

use crate::style;
use crate::Workspace;

const LONG_ABOUT: &str = "Commits changes to the repository using `git commit`, but randomly chooses the \
author email from the members of the pair. In order for GitHub to assign credit for the commit \
activity, the user's email must be linked in their GitHub account.";

/// Commit as the current pair, crediting one member at random.
#[derive(Parser, Debug)]
#[command(
    name = "git-pair-commit",
    version,
    override_usage = "git pair-commit [options_for_git_commit]",
    long_about = LONG_ABOUT
)]
pub struct CommitArgs {
    /// Options passed through to `git commit`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Run `git pair-commit`, returning git's exit status.
pub async fn run_commit(args: CommitArgs) -> Result<ExitCode> {
    let workspace = Workspace::discover()?;
    let store = Git2ConfigStore::open(&workspace.repo, false).context("failed to open git config")?;
    let initials = stored_initials(&store)?;

    let identity = compose_commit_identity(&initials, &workspace.config, &mut rand::thread_rng())?;
    println!("Committing under {}", style::value(&identity.email));

    // Relative pathspecs resolve against the current directory.
    let status = GitCommit::new().run(&identity, &args.git_args).await?;
    Ok(ExitCode::from(exit_code(status)))
}

/// git's exit code; killed by a signal counts as failure.
fn exit_code(status: ExitStatus) -> u8 {
    status
        .code()
        .map(|code| u8::try_from(code).unwrap_or(1))
        .unwrap_or(1)
}
