//! Applying a pair to the git configuration.
//!
//! [`PairUpdate`] wires the pairs file, the requested initials and a
//! [`ConfigStore`] together: it composes the set-mode identity and writes
//! it, unsetting keys that have no value.

use tracing::{info, warn};

use crate::config::PairsConfig;
use crate::errors::{CoreError, GitError, PairError};
use crate::git::{ConfigStore, USER_EMAIL, USER_INITIALS, USER_NAME};
use crate::pairing::{compose_set_identity, EmailUpdate, SetIdentity};

/// The record handed to the config store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSettings {
    pub name: Option<String>,
    pub email: EmailUpdate,
    pub initials: Option<String>,
    /// Requested flag, else the pairs file's `global`, else false.
    pub global: bool,
}

impl PairSettings {
    fn new(identity: SetIdentity, global: bool) -> Self {
        Self {
            name: identity.name,
            email: identity.email,
            initials: identity.initials,
            global,
        }
    }

    /// Whether this update clears the pair instead of setting one.
    pub fn is_unset(&self) -> bool {
        self.name.is_none() && self.initials.is_none()
    }

    /// The summary printed after clearing the pair.
    pub fn unset_message(&self) -> String {
        format!(
            "Unset{} user.name, {}user.initials",
            if self.global { " global" } else { "" },
            if self.email == EmailUpdate::Untouched {
                ""
            } else {
                "user.email, "
            }
        )
    }
}

/// Builder for one `git pair` invocation.
#[derive(Default)]
pub struct PairUpdate<'a> {
    store: Option<&'a mut dyn ConfigStore>,
    config: Option<&'a PairsConfig>,
    initials: Vec<String>,
    global: bool,
}

impl<'a> PairUpdate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The git configuration scope to write to.
    pub fn store(mut self, store: &'a mut dyn ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The loaded pairs file.
    pub fn config(mut self, config: &'a PairsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Initials to pair with. Empty clears the pair.
    pub fn initials<I, S>(mut self, initials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initials = initials.into_iter().map(Into::into).collect();
        self
    }

    /// `--global` as given on the command line.
    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Compose the settings without writing them.
    pub fn plan(&self) -> Result<PairSettings, PairError> {
        let config = self.config.ok_or(PairError::MissingCollaborator("pairs config"))?;
        let identity = compose_set_identity(&self.initials, config)?;
        Ok(PairSettings::new(identity, config.effective_global(self.global)))
    }

    /// Compose the settings and write them to the store.
    ///
    /// Nothing is written unless composition succeeds.
    pub fn apply(self) -> Result<PairSettings, CoreError> {
        let settings = self.plan()?;
        let store = self
            .store
            .ok_or(PairError::MissingCollaborator("git config store"))?;
        if store.is_global() != settings.global {
            warn!(
                store_global = store.is_global(),
                settings_global = settings.global,
                "config store scope does not match the requested scope"
            );
            return Err(PairError::MissingCollaborator(if settings.global {
                "global git config store"
            } else {
                "repository git config store"
            })
            .into());
        }

        write_settings(store, &settings)?;
        info!(
            global = settings.global,
            unset = settings.is_unset(),
            "applied pair settings"
        );
        Ok(settings)
    }
}

/// Write `settings` to `store`: values are set, missing values unset, an
/// untouched email is left alone.
pub fn write_settings(store: &mut dyn ConfigStore, settings: &PairSettings) -> Result<(), GitError> {
    write_or_unset(store, USER_NAME, settings.name.as_deref())?;
    match &settings.email {
        EmailUpdate::Untouched => {}
        EmailUpdate::Clear => store.unset(USER_EMAIL)?,
        EmailUpdate::Set(address) => store.write(USER_EMAIL, address)?,
    }
    write_or_unset(store, USER_INITIALS, settings.initials.as_deref())
}

fn write_or_unset(
    store: &mut dyn ConfigStore,
    key: &str,
    value: Option<&str>,
) -> Result<(), GitError> {
    match value {
        Some(value) => store.write(key, value),
        None => store.unset(key),
    }
}
