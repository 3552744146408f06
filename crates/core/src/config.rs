//! Pairs file configuration.
//!
//! The pairs file maps initials to author names and describes how the pair
//! email address is built. It is YAML (`.pairs`) or TOML (`.pairs.toml`):
//!
//! ```yaml
//! pairs:
//!   eh: Edward Hieatt
//!   js: Josh Susser; jsusser
//! email:
//!   prefix: pair
//!   domain: pivotallabs.com
//!   # no_solo_prefix: true
//! #global: true
//! #email_addresses:
//! #  zr: zach.robinson@example.com
//! ```
//!
//! The document is parsed and validated once, so the resolution engine can
//! assume well-formed input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// File name of the YAML pairs file.
pub const PAIRS_FILE_NAME: &str = ".pairs";

/// File name of the TOML pairs file, consulted when no `.pairs` exists.
pub const PAIRS_TOML_FILE_NAME: &str = ".pairs.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// The parsed pairs file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PairsConfig {
    /// Initials -> `"Full Name"` or `"Full Name; email-local-part"`.
    #[serde(default)]
    pub pairs: BTreeMap<String, String>,

    /// How `user.email` is derived, if at all.
    #[serde(default, deserialize_with = "deserialize_email_policy")]
    pub email: EmailPolicy,

    /// Initials -> literal address, used when crediting a single author.
    #[serde(default)]
    pub email_addresses: BTreeMap<String, String>,

    /// Write to the global git config instead of the repository's.
    #[serde(default)]
    pub global: bool,
}

// ---------------------------------------------------------------------------
// Email policy
// ---------------------------------------------------------------------------

/// The `email` section of the pairs file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmailPolicy {
    /// No `email` key: email is never touched.
    #[default]
    Absent,
    /// `email:` present with no value: email is cleared on every update.
    Cleared,
    /// A fixed address used verbatim.
    Literal(String),
    /// An address assembled from the participants' local parts.
    Composed(ComposedEmail),
}

impl EmailPolicy {
    /// Whether the pairs file has an `email` key at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, EmailPolicy::Absent)
    }

    /// The configured domain, when the policy is composed.
    pub fn domain(&self) -> Option<&str> {
        match self {
            EmailPolicy::Composed(composed) => Some(composed.domain.as_str()),
            _ => None,
        }
    }
}

/// Settings for building `prefix+local+local@domain` addresses.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ComposedEmail {
    /// Leading local-part segment, e.g. `pair`.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Domain appended after `@`.
    pub domain: String,

    /// Drop the prefix when only one author is set.
    #[serde(default)]
    pub no_solo_prefix: bool,

    /// Initials whose address is always used instead of composing one.
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEmail {
    Literal(String),
    Composed(ComposedEmail),
}

/// Only called when the key exists, so `null` maps to `Cleared` while a
/// missing key falls back to `EmailPolicy::default()`.
fn deserialize_email_policy<'de, D>(deserializer: D) -> Result<EmailPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawEmail>::deserialize(deserializer)?;
    Ok(match raw {
        None => EmailPolicy::Cleared,
        Some(RawEmail::Literal(address)) => EmailPolicy::Literal(address),
        Some(RawEmail::Composed(composed)) => EmailPolicy::Composed(composed),
    })
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl PairsConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PairsConfig =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                path: "<yaml>".into(),
                detail: e.to_string(),
            })?;
        config.normalized()
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PairsConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: "<toml>".into(),
            detail: e.to_string(),
        })?;
        config.normalized()
    }

    /// Load a pairs file from disk. Files ending in `.toml` are read as
    /// TOML, everything else as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading pairs file");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let parsed = if is_toml {
            toml::from_str::<PairsConfig>(&contents).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<PairsConfig>(&contents).map_err(|e| e.to_string())
        };
        let config = parsed.map_err(|detail| ConfigError::ParseError {
            path: path.display().to_string(),
            detail,
        })?;

        debug!(authors = config.pairs.len(), "pairs file parsed successfully");
        config.normalized()
    }

    /// Find the nearest pairs file above `start` (or in `home`) and load it.
    pub fn load_nearest(start: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let path = find_pairs_file(start, home)?;
        Self::load_from_file(path)
    }

    /// Lower-case initials keys, then validate.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.pairs = lowercase_keys(std::mem::take(&mut self.pairs), "pairs")?;
        self.email_addresses =
            lowercase_keys(std::mem::take(&mut self.email_addresses), "email_addresses")?;
        self.validate()?;
        Ok(self)
    }

    /// Check the configuration for obvious mistakes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (initials, entry) in &self.pairs {
            if initials.trim().is_empty() || initials.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    field: "pairs".into(),
                    detail: format!("initials '{}' must be a single non-empty word", initials),
                });
            }
            let name = entry.split(';').next().unwrap_or_default().trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("pairs.{}", initials),
                    detail: "entry must start with the author's full name".into(),
                });
            }
        }

        if let EmailPolicy::Composed(composed) = &self.email {
            if composed.domain.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "email.domain".into(),
                    detail: "email domain must not be empty".into(),
                });
            }
        }

        for (initials, address) in &self.email_addresses {
            if address.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("email_addresses.{}", initials),
                    detail: "email address must not be empty".into(),
                });
            }
        }

        Ok(())
    }

    /// Resolve the global flag: an explicit request wins, then the file.
    pub fn effective_global(&self, requested: bool) -> bool {
        requested || self.global
    }

    /// The override address for `initials`, if one is configured.
    pub fn custom_address(&self, initials: &str) -> Option<&str> {
        self.email_addresses
            .get(&initials.to_lowercase())
            .map(String::as_str)
    }

    /// An example pairs file, shown when none can be found.
    pub fn example_template() -> &'static str {
        r#"Format: <initials>: <name>[; <email>]
Example:
# .pairs - configuration for 'git pair'
# place in project or home directory
pairs:
  eh: Edward Hieatt
  js: Josh Susser; jsusser
  sf: Serguei Filimonov; serguei
email:
  prefix: pair
  domain: pivotallabs.com
"#
    }
}

fn lowercase_keys(
    map: BTreeMap<String, String>,
    section: &str,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut out = BTreeMap::new();
    for (key, value) in map {
        let lowered = key.to_lowercase();
        if out.insert(lowered.clone(), value).is_some() {
            return Err(ConfigError::InvalidValue {
                field: section.into(),
                detail: format!("initials '{}' are defined more than once", lowered),
            });
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Directories searched for a pairs file, nearest first: `start`, each of
/// its ancestors up to the root, then `home` unless already listed.
pub fn candidate_directories(start: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = start.ancestors().map(Path::to_path_buf).collect();
    if let Some(home) = home {
        if !dirs.iter().any(|d| d == home) {
            dirs.push(home.to_path_buf());
        }
    }
    dirs
}

/// Locate the nearest pairs file. `.pairs` takes precedence over
/// `.pairs.toml` within the same directory.
pub fn find_pairs_file(start: &Path, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    for dir in candidate_directories(start, home) {
        for name in [PAIRS_FILE_NAME, PAIRS_TOML_FILE_NAME] {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found pairs file");
                return Ok(candidate);
            }
        }
    }
    Err(ConfigError::NotFound(
        PairsConfig::example_template().to_string(),
    ))
}
