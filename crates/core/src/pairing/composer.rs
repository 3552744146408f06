//! Combining resolved authors into the identity git should use.
//!
//! Set mode is deterministic and produces what `git pair` stores in the
//! git config. Commit mode credits one randomly chosen author and is used
//! for a single `git pair-commit`.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::resolver::{
    canonical_initials, has_email_policy, lookup_author, resolve_authors, AuthorSpec,
};
use crate::config::{EmailPolicy, PairsConfig};
use crate::errors::PairError;

/// What to do with `user.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailUpdate {
    /// Leave the key alone (no `email` section in the pairs file).
    Untouched,
    /// Unset the key.
    Clear,
    /// Write this address.
    Set(String),
}

impl EmailUpdate {
    /// The address to write, if any.
    pub fn address(&self) -> Option<&str> {
        match self {
            EmailUpdate::Set(address) => Some(address),
            _ => None,
        }
    }
}

/// The identity `git pair` stores. `None` means "unset".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetIdentity {
    pub name: Option<String>,
    pub email: EmailUpdate,
    pub initials: Option<String>,
}

/// The identity used for a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    /// Every author's name, in canonical order.
    pub name: String,
    /// The credited author's address.
    pub email: String,
    /// The author whose mailbox gets the credit.
    pub credited: AuthorSpec,
    /// The credited author first, then the rest.
    pub authors: Vec<AuthorSpec>,
}

/// Join names as `A`, `A and B`, `A, B and C`. Empty names are skipped.
pub fn compose_display_name<S: AsRef<str>>(names: &[S]) -> String {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n: &&str| !n.is_empty())
        .collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Build the pair email address for the given local parts.
///
/// Returns `Ok(None)` when the pairs file has no usable email policy. The
/// `author` alias of a composed policy always yields that author's own
/// address, ignoring the prefix.
pub fn compose_email<S: AsRef<str>>(
    local_parts: &[S],
    config: &PairsConfig,
) -> Result<Option<String>, PairError> {
    let composed = match &config.email {
        EmailPolicy::Absent | EmailPolicy::Cleared => return Ok(None),
        EmailPolicy::Literal(address) => return Ok(Some(address.clone())),
        EmailPolicy::Composed(composed) => composed,
    };

    if let Some(alias) = &composed.author {
        let author = lookup_author(config, alias)?;
        debug!(alias = %alias, "using aliased author email");
        return Ok(Some(format!(
            "{}@{}",
            author.email_local_part, composed.domain
        )));
    }

    let prefix = composed
        .prefix
        .as_deref()
        .filter(|p| !p.is_empty())
        .filter(|_| !composed.no_solo_prefix || local_parts.len() > 1);

    let local: Vec<&str> = prefix
        .into_iter()
        .chain(local_parts.iter().map(|p| p.as_ref()))
        .collect();
    Ok(Some(format!("{}@{}", local.join("+"), composed.domain)))
}

/// Compose the identity `git pair` writes to the git config.
///
/// No initials means "unset everything": name and initials are cleared,
/// and email too when the pairs file has an `email` key.
pub fn compose_set_identity<S: AsRef<str>>(
    initials: &[S],
    config: &PairsConfig,
) -> Result<SetIdentity, PairError> {
    if initials.is_empty() {
        let email = if has_email_policy(config) {
            EmailUpdate::Clear
        } else {
            EmailUpdate::Untouched
        };
        return Ok(SetIdentity {
            name: None,
            email,
            initials: None,
        });
    }

    let authors = resolve_authors(config, initials)?;
    let names: Vec<&str> = authors.iter().map(|a| a.full_name.as_str()).collect();
    let local_parts: Vec<&str> = authors.iter().map(|a| a.email_local_part.as_str()).collect();

    let email = if has_email_policy(config) {
        match compose_email(&local_parts, config)? {
            Some(address) => EmailUpdate::Set(address),
            None => EmailUpdate::Clear,
        }
    } else {
        EmailUpdate::Untouched
    };

    Ok(SetIdentity {
        name: Some(compose_display_name(&names)),
        email,
        initials: Some(canonical_initials(initials).join(" ")),
    })
}

/// The real mailbox of a single author: an `email_addresses` override,
/// else `local-part@domain`.
pub fn credited_address(config: &PairsConfig, author: &AuthorSpec) -> Result<String, PairError> {
    if let Some(address) = config.custom_address(&author.initials) {
        return Ok(address.to_string());
    }
    match config.email.domain() {
        Some(domain) => Ok(format!("{}@{}", author.email_local_part, domain)),
        None => Err(PairError::NoEmailDomain(author.initials.clone())),
    }
}

/// Compose the identity for one commit, crediting a uniformly chosen
/// author. `rng` is the only source of randomness.
pub fn compose_commit_identity<S, R>(
    initials: &[S],
    config: &PairsConfig,
    rng: &mut R,
) -> Result<CommitIdentity, PairError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if initials.is_empty() {
        return Err(PairError::NoPairSet);
    }

    let canonical = resolve_authors(config, initials)?;
    let names: Vec<&str> = canonical.iter().map(|a| a.full_name.as_str()).collect();
    let name = compose_display_name(&names);

    let candidates = canonical_initials(initials)
        .iter()
        .map(|i| lookup_author(config, i))
        .collect::<Result<Vec<_>, _>>()?;
    let credited = candidates.choose(rng).cloned().ok_or(PairError::NoPairSet)?;
    let email = credited_address(config, &credited)?;
    info!(initials = %credited.initials, email = %email, "credited author");

    let mut authors = Vec::with_capacity(candidates.len());
    authors.push(credited.clone());
    authors.extend(candidates.into_iter().filter(|a| a.initials != credited.initials));

    Ok(CommitIdentity {
        name,
        email,
        credited,
        authors,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn the_pair_config() -> PairsConfig {
        PairsConfig::from_yaml_str(
            r#"
pairs:
  ab: Aa Bb
  bc: Bb Cc
  cd: Cc Dd
email:
  prefix: the-pair
  domain: the-host.com
"#,
        )
        .unwrap()
    }

    fn biddington_config(email: &str) -> PairsConfig {
        PairsConfig::from_yaml_str(&format!(
            r#"
pairs:
  bb: Ben Biddington; ben.biddington
  rf: Richard Bizzness; ricky.bizzness
  tb: Tim Biddington; mud.man
{}
"#,
            email
        ))
        .unwrap()
    }

    #[test]
    fn test_display_name_join_rules() {
        assert_eq!(compose_display_name::<&str>(&[]), "");
        assert_eq!(compose_display_name(&["Aa Bb"]), "Aa Bb");
        assert_eq!(compose_display_name(&["Aa Bb", "Bb Cc"]), "Aa Bb and Bb Cc");
        assert_eq!(
            compose_display_name(&["Aa Bb", "Bb Cc", "Cc Dd"]),
            "Aa Bb, Bb Cc and Cc Dd"
        );
        assert_eq!(compose_display_name(&["", "Bb Cc"]), "Bb Cc");
        assert_eq!(compose_display_name(&["Aa Bb", "", "Cc Dd"]), "Aa Bb and Cc Dd");
    }

    #[test]
    fn test_set_identity_grows_with_pair() {
        let config = the_pair_config();

        let one = compose_set_identity(&["ab"], &config).unwrap();
        assert_eq!(one.name.as_deref(), Some("Aa Bb"));
        assert_eq!(one.email, EmailUpdate::Set("the-pair+aa@the-host.com".into()));

        let two = compose_set_identity(&["ab", "bc"], &config).unwrap();
        assert_eq!(two.name.as_deref(), Some("Aa Bb and Bb Cc"));
        assert_eq!(two.email.address(), Some("the-pair+aa+bb@the-host.com"));

        let three = compose_set_identity(&["ab", "bc", "cd"], &config).unwrap();
        assert_eq!(three.name.as_deref(), Some("Aa Bb, Bb Cc and Cc Dd"));
        assert_eq!(three.email.address(), Some("the-pair+aa+bb+cc@the-host.com"));
    }

    #[test]
    fn test_set_identity_initials_are_canonical() {
        let config = the_pair_config();
        let identity = compose_set_identity(&["CD", "ab", "bc"], &config).unwrap();
        assert_eq!(identity.initials.as_deref(), Some("ab bc cd"));
    }

    #[test]
    fn test_set_identity_is_order_independent() {
        let config = the_pair_config();
        let expected = compose_set_identity(&["ab", "bc", "cd"], &config).unwrap();
        for order in [
            ["ab", "cd", "bc"],
            ["bc", "ab", "cd"],
            ["bc", "cd", "ab"],
            ["cd", "ab", "bc"],
            ["CD", "BC", "AB"],
        ] {
            assert_eq!(compose_set_identity(&order, &config).unwrap(), expected);
        }
    }

    #[test]
    fn test_no_solo_prefix() {
        let config = PairsConfig::from_yaml_str(
            r#"
pairs:
  aa: Aa Zz
  bb: Bb Zz
email:
  prefix: pairs
  domain: foo.com
  no_solo_prefix: true
"#,
        )
        .unwrap();

        let solo = compose_set_identity(&["aa"], &config).unwrap();
        assert_eq!(solo.email.address(), Some("aa@foo.com"));

        let pair = compose_set_identity(&["aa", "bb"], &config).unwrap();
        assert_eq!(pair.email.address(), Some("pairs+aa+bb@foo.com"));
    }

    #[test]
    fn test_email_without_prefix_combines_local_parts() {
        let config = biddington_config("email:\n  domain: aol.com");
        let identity = compose_set_identity(&["rf", "bb"], &config).unwrap();
        assert_eq!(identity.name.as_deref(), Some("Ben Biddington and Richard Bizzness"));
        assert_eq!(
            identity.email.address(),
            Some("ben.biddington+ricky.bizzness@aol.com")
        );
    }

    #[test]
    fn test_literal_email_ignores_participants() {
        let config = biddington_config("email: team@example.com");
        for initials in [vec!["bb"], vec!["bb", "rf", "tb"]] {
            let identity = compose_set_identity(&initials, &config).unwrap();
            assert_eq!(identity.email.address(), Some("team@example.com"));
        }
    }

    #[test]
    fn test_author_alias_uses_single_address() {
        let config = biddington_config(
            "email:\n  author: rf\n  prefix: pair\n  no_solo_prefix: true\n  domain: aol.com",
        );
        let identity = compose_set_identity(&["bb", "rf"], &config).unwrap();
        assert_eq!(identity.email.address(), Some("ricky.bizzness@aol.com"));
    }

    #[test]
    fn test_author_alias_must_exist() {
        let config = biddington_config("email:\n  author: zz\n  domain: aol.com");
        let err = compose_set_identity(&["bb"], &config).unwrap_err();
        assert_eq!(err, PairError::UnknownInitials("zz".into()));
    }

    #[test]
    fn test_no_email_section_leaves_email_untouched() {
        let config = biddington_config("");
        let set = compose_set_identity(&["bb", "rf"], &config).unwrap();
        assert_eq!(set.email, EmailUpdate::Untouched);

        let unset = compose_set_identity::<&str>(&[], &config).unwrap();
        assert_eq!(unset.email, EmailUpdate::Untouched);
        assert_eq!(unset.name, None);
        assert_eq!(unset.initials, None);
    }

    #[test]
    fn test_empty_request_clears_identity() {
        let config = biddington_config("email:\n  domain: aol.com\n  no_solo_prefix: true");
        let identity = compose_set_identity::<&str>(&[], &config).unwrap();
        assert_eq!(
            identity,
            SetIdentity {
                name: None,
                email: EmailUpdate::Clear,
                initials: None,
            }
        );
    }

    #[test]
    fn test_null_email_section_clears_email() {
        let config = biddington_config("email:");
        let identity = compose_set_identity(&["bb"], &config).unwrap();
        assert_eq!(identity.email, EmailUpdate::Clear);
        assert_eq!(identity.name.as_deref(), Some("Ben Biddington"));
    }

    #[test]
    fn test_set_identity_unknown_initials() {
        let config = the_pair_config();
        let err = compose_set_identity(&["ab", "xx"], &config).unwrap_err();
        assert!(err
            .to_string()
            .contains("Couldn't find author name for initials: xx"));
    }

    #[test]
    fn test_commit_identity_requires_pair() {
        let config = the_pair_config();
        let mut rng = StdRng::seed_from_u64(1);
        let err = compose_commit_identity::<&str, _>(&[], &config, &mut rng).unwrap_err();
        assert_eq!(err, PairError::NoPairSet);
    }

    #[test]
    fn test_commit_identity_unknown_initials() {
        let config = the_pair_config();
        let mut rng = StdRng::seed_from_u64(1);
        let err = compose_commit_identity(&["ab", "xx"], &config, &mut rng).unwrap_err();
        assert_eq!(err, PairError::UnknownInitials("xx".into()));
    }

    #[test]
    fn test_commit_identity_credits_every_author() {
        let config = PairsConfig::from_yaml_str(
            r#"
pairs:
  aa: Anne Atkinson; anne
  bb: Bob Bilgewater; bob
email:
  prefix: pair
  domain: example.com
"#,
        )
        .unwrap();

        let mut rng = rand::thread_rng();
        let mut emails = BTreeSet::new();
        for _ in 0..200 {
            let identity = compose_commit_identity(&["bb", "aa"], &config, &mut rng).unwrap();
            assert_eq!(identity.name, "Anne Atkinson and Bob Bilgewater");
            assert_eq!(identity.email, format!("{}@example.com", identity.credited.email_local_part));
            assert_eq!(identity.authors[0], identity.credited);
            assert_eq!(identity.authors.len(), 2);
            emails.insert(identity.email);
        }
        let emails: Vec<String> = emails.into_iter().collect();
        assert_eq!(emails, ["anne@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_commit_identity_uses_custom_address() {
        let config = PairsConfig::from_yaml_str(
            r#"
pairs:
  zr: Zach Robinson
email:
  prefix: pair
  domain: pivotallabs.com
email_addresses:
  ZR: zach.robinson@example.com
"#,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let identity = compose_commit_identity(&["zr"], &config, &mut rng).unwrap();
        assert_eq!(identity.name, "Zach Robinson");
        assert_eq!(identity.email, "zach.robinson@example.com");
    }

    #[test]
    fn test_commit_identity_never_prefixes() {
        let config = the_pair_config();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let identity = compose_commit_identity(&["ab", "bc", "cd"], &config, &mut rng).unwrap();
            assert!(!identity.email.contains('+'));
            assert!(identity.email.ends_with("@the-host.com"));
            assert_eq!(identity.name, "Aa Bb, Bb Cc and Cc Dd");
        }
    }

    #[test]
    fn test_commit_identity_needs_domain_or_override() {
        let config = biddington_config("email: team@example.com");
        let mut rng = StdRng::seed_from_u64(3);
        let err = compose_commit_identity(&["bb"], &config, &mut rng).unwrap_err();
        assert_eq!(err, PairError::NoEmailDomain("bb".into()));
    }
}
