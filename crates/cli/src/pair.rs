//! `git pair`: set or clear the pair in the git configuration.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use gitpair_core::git::{Git2ConfigStore, SettingReport, USER_EMAIL, USER_INITIALS, USER_NAME};
use gitpair_core::PairUpdate;

use crate::style;
use crate::Workspace;

const LONG_ABOUT: &str = r#"Configures git authors when pair programming.

    git pair sp js
    user.name=Josh Susser and Sam Pierson
    user.email=pair+jsusser+sam@pivotallabs.com

Create a `.pairs` config file in project root or your home folder.

    # .pairs - configuration for 'git pair'
    pairs:
      # <initials>: <Firstname> <Lastname>[; <email-id>]
      eh: Edward Hieatt
      js: Josh Susser; jsusser
      sf: Serguei Filimonov; serguei
    # if email section is present, email will be set
    # if you leave out the email config section, email will not be set
    email:
      prefix: pair
      domain: pivotallabs.com
      # no_solo_prefix: true
    #global: true
    # include the following section to set custom email addresses for users
    #email_addresses:
    #  zr: zach.robinson@example.com

By default this affects the current project (.git/config).
Use the `--global` option or add `global: true` to your `.pairs` file to set
the global git configuration for all projects (~/.gitconfig)."#;

/// Configures git authors when pair programming.
#[derive(Parser, Debug)]
#[command(name = "git-pair", version, long_about = LONG_ABOUT)]
pub struct PairArgs {
    /// Modify global git options instead of local.
    #[arg(short, long)]
    pub global: bool,

    /// Initials of everyone in the pair. Omit to unset the pair.
    pub initials: Vec<String>,
}

/// Run `git pair`.
pub fn run_pair(args: PairArgs) -> Result<()> {
    let workspace = Workspace::discover()?;
    let global = workspace.config.effective_global(args.global);
    debug!(global, initials = ?args.initials, "updating pair");

    let mut store = Git2ConfigStore::open(&workspace.repo, global)
        .context("failed to open git config")?;
    let settings = PairUpdate::new()
        .config(&workspace.config)
        .store(&mut store)
        .initials(args.initials)
        .global(args.global)
        .apply()?;

    if settings.is_unset() {
        println!("{}", settings.unset_message());
    }

    for key in [USER_NAME, USER_EMAIL, USER_INITIALS] {
        let report = SettingReport::collect(&workspace.repo, key)
            .with_context(|| format!("failed to read {}", key))?;
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SettingReport) {
    for line in report.lines() {
        if line.starts_with("NOTE:") {
            println!("{}", style::note(&line));
        } else if line.starts_with("global:") {
            println!("{}", style::dim(&line));
        } else {
            println!("{}", line);
        }
    }
}
