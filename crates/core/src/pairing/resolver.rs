//! Resolution of requested initials into author records.

use tracing::debug;

use crate::config::PairsConfig;
use crate::errors::PairError;

/// One author as described by a `pairs` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSpec {
    /// Lower-cased initials the entry was found under.
    pub initials: String,
    /// Display name, e.g. `Josh Susser`.
    pub full_name: String,
    /// Part of the address before `@`, e.g. `jsusser`.
    pub email_local_part: String,
}

impl AuthorSpec {
    /// Parse a `"Full Name"` or `"Full Name; local-part"` entry.
    ///
    /// Without a local part, the lower-cased first word of the name is used.
    pub fn parse(initials: &str, entry: &str) -> Self {
        let mut parts = entry.split(';').map(str::trim);
        let full_name = parts.next().unwrap_or_default().to_string();
        let email_local_part = match parts.next().filter(|p| !p.is_empty()) {
            Some(local) => local.to_string(),
            None => full_name
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_lowercase(),
        };
        Self {
            initials: initials.to_lowercase(),
            full_name,
            email_local_part,
        }
    }
}

/// Look up the raw `pairs` entry for `initials` (case-insensitive).
pub fn lookup_entry<'a>(config: &'a PairsConfig, initials: &str) -> Result<&'a str, PairError> {
    config
        .pairs
        .get(&initials.to_lowercase())
        .map(String::as_str)
        .ok_or_else(|| PairError::UnknownInitials(initials.to_string()))
}

/// Look up and parse the author for `initials`.
pub fn lookup_author(config: &PairsConfig, initials: &str) -> Result<AuthorSpec, PairError> {
    lookup_entry(config, initials).map(|entry| AuthorSpec::parse(initials, entry))
}

/// Resolve every requested initials into an author, in canonical order.
///
/// Entries are sorted and de-duplicated on the raw `pairs` string before
/// they are split into name and local part. Two initials pointing at the
/// exact same string collapse to one author; the same name with different
/// local parts stays as two.
///
/// Unknown initials are reported verbatim, all of them at once.
pub fn resolve_authors<S: AsRef<str>>(
    config: &PairsConfig,
    initials: &[S],
) -> Result<Vec<AuthorSpec>, PairError> {
    let mut missing = Vec::new();
    let mut entries: Vec<(&str, String)> = Vec::with_capacity(initials.len());

    for requested in initials {
        let requested = requested.as_ref();
        match lookup_entry(config, requested) {
            Ok(entry) => entries.push((entry, requested.to_lowercase())),
            Err(_) => missing.push(requested.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(PairError::UnknownInitials(missing.join(", ")));
    }

    // Order and dedup key on the raw entry, not on the parsed author.
    entries.sort();
    entries.dedup_by(|a, b| a.0 == b.0);

    let authors: Vec<AuthorSpec> = entries
        .into_iter()
        .map(|(entry, initials)| AuthorSpec::parse(&initials, entry))
        .collect();
    debug!(count = authors.len(), "resolved authors");
    Ok(authors)
}

/// Whether the pairs file has an `email` key, whatever its value.
pub fn has_email_policy(config: &PairsConfig) -> bool {
    config.email.is_present()
}

/// Lower-cased, sorted, de-duplicated initials.
pub fn canonical_initials<S: AsRef<str>>(initials: &[S]) -> Vec<String> {
    let mut canonical: Vec<String> = initials
        .iter()
        .map(|i| i.as_ref().to_lowercase())
        .collect();
    canonical.sort();
    canonical.dedup();
    canonical
}
