//! Git plumbing for git-pair: config access and commit invocation.

pub mod commit;
pub mod config_store;

pub use commit::GitCommit;
pub use config_store::{
    stored_initials, ConfigStore, Git2ConfigStore, SettingReport, USER_EMAIL, USER_INITIALS, USER_NAME,
};
