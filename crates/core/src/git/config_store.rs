//! Reading and writing `user.*` keys in the git configuration.

use std::path::{Path, PathBuf};

use git2::{Config, ConfigLevel, ErrorCode, Repository};
use tracing::{debug, info, instrument};

use crate::errors::GitError;

pub const USER_NAME: &str = "user.name";
pub const USER_EMAIL: &str = "user.email";
pub const USER_INITIALS: &str = "user.initials";

/// A git configuration scope that pair settings are written to.
pub trait ConfigStore {
    /// Whether writes go to the global (per-user) configuration.
    fn is_global(&self) -> bool;

    /// The effective value of `key`, if set.
    fn read(&self, key: &str) -> Result<Option<String>, GitError>;

    /// Set `key` to `value`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), GitError>;

    /// Remove `key`. Removing a key that is not set succeeds.
    fn unset(&mut self, key: &str) -> Result<(), GitError>;
}

/// [`ConfigStore`] backed by `git2`.
///
/// Reads see the merged configuration (system, global, repository); writes
/// go to either the repository's `.git/config` or the global config file.
pub struct Git2ConfigStore {
    reader: Config,
    writer: Config,
    global: bool,
}

impl Git2ConfigStore {
    /// Open the store for `repo`, writing globally when `global` is set.
    pub fn open(repo: &Repository, global: bool) -> Result<Self, GitError> {
        let reader = repo.config()?;
        let writer = if global {
            match reader.open_level(ConfigLevel::Global) {
                Ok(config) => config,
                Err(e) if e.code() == ErrorCode::NotFound => Config::open(&global_config_path()?)?,
                Err(e) => return Err(e.into()),
            }
        } else {
            reader.open_level(ConfigLevel::Local)?
        };
        info!(global, "opened git config store");
        Ok(Self {
            reader,
            writer,
            global,
        })
    }

    /// Open a store that reads and writes a single config file.
    pub fn open_file<P: AsRef<Path>>(path: P, global: bool) -> Result<Self, GitError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening git config file");
        if !path.exists() {
            std::fs::File::create(path)?;
        }
        Ok(Self {
            reader: Config::open(path)?,
            writer: Config::open(path)?,
            global,
        })
    }
}

impl ConfigStore for Git2ConfigStore {
    fn is_global(&self) -> bool {
        self.global
    }

    fn read(&self, key: &str) -> Result<Option<String>, GitError> {
        read_entry(&self.reader, key)
    }

    #[instrument(skip(self, value), fields(global = self.global))]
    fn write(&mut self, key: &str, value: &str) -> Result<(), GitError> {
        self.writer.set_str(key, value)?;
        debug!(key, value, "wrote git config");
        Ok(())
    }

    #[instrument(skip(self), fields(global = self.global))]
    fn unset(&mut self, key: &str) -> Result<(), GitError> {
        match self.writer.remove(key) {
            Ok(()) => {
                debug!(key, "unset git config");
                Ok(())
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The initials of the pair currently stored in `user.initials`.
///
/// Returns an empty list when no pair is set.
pub fn stored_initials(store: &dyn ConfigStore) -> Result<Vec<String>, GitError> {
    let stored = store.read(USER_INITIALS)?.unwrap_or_default();
    Ok(stored.split_whitespace().map(str::to_string).collect())
}

/// Read `key` without requiring a config snapshot.
fn read_entry(config: &Config, key: &str) -> Result<Option<String>, GitError> {
    match config.get_entry(key) {
        Ok(entry) => Ok(entry.value().map(str::to_string)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn global_config_path() -> Result<PathBuf, GitError> {
    dirs::home_dir()
        .map(|home| home.join(".gitconfig"))
        .ok_or_else(|| GitError::RepositoryNotFound("home directory for ~/.gitconfig".into()))
}

// ---------------------------------------------------------------------------
// Settings report
// ---------------------------------------------------------------------------

/// Global and repository values of one `user.*` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingReport {
    pub key: String,
    pub global: Option<String>,
    pub local: Option<String>,
}

impl SettingReport {
    /// Collect the report for `key` from the global and repository files.
    pub fn collect(repo: &Repository, key: &str) -> Result<Self, GitError> {
        let global = match Config::open_default()?.open_level(ConfigLevel::Global) {
            Ok(config) => Some(config),
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        let local = match repo.config()?.open_level(ConfigLevel::Local) {
            Ok(config) => Some(config),
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Self::from_configs(key, global.as_ref(), local.as_ref())
    }

    /// Build the report from already opened configs.
    pub fn from_configs(
        key: &str,
        global: Option<&Config>,
        local: Option<&Config>,
    ) -> Result<Self, GitError> {
        let read = |config: Option<&Config>| match config {
            Some(config) => read_entry(config, key),
            None => Ok(None),
        };
        Ok(Self {
            key: key.to_string(),
            global: read(global)?,
            local: read(local)?,
        })
    }

    /// The repository value shadows a global one.
    pub fn overrides_global(&self) -> bool {
        self.global.is_some() && self.local.is_some()
    }

    /// Human-readable summary lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.overrides_global() {
            lines.push(format!(
                "NOTE: Overriding global {} setting with local.",
                self.key
            ));
        }
        if let Some(value) = &self.global {
            lines.push(format!("global: {} {}", self.key, value));
        }
        if let Some(value) = &self.local {
            lines.push(format!("local:  {} {}", self.key, value));
        }
        lines
    }
}
