//! Pair resolution engine.
//!
//! Turns a pairs file plus a list of initials into the identity git should
//! use. Nothing here touches git or the filesystem:
//! 1. [`resolver`] validates initials and extracts author records
//! 2. [`composer`] combines them into a display name and email address

pub mod composer;
pub mod resolver;

pub use composer::{
    compose_commit_identity, compose_display_name, compose_email, compose_set_identity,
    credited_address, CommitIdentity, EmailUpdate, SetIdentity,
};
pub use resolver::{canonical_initials, has_email_policy, resolve_authors, AuthorSpec};
