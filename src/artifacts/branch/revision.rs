//! Commit id resolution
//!
//! Users may name a commit by any hexadecimal prefix of its id. A prefix
//! resolves only when exactly one stored commit matches it.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;

const COMMIT_ID_PREFIX_REGEX: &str = r"^[0-9a-fA-F]{1,40}$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    /// Accept anything that could be an id prefix
    ///
    /// Non-hex input can never name a commit, so it fails the same way an
    /// unknown id does.
    pub fn try_parse(revision: &str) -> anyhow::Result<Self> {
        let re = regex::Regex::new(COMMIT_ID_PREFIX_REGEX)
            .with_context(|| format!("invalid commit id regex: {COMMIT_ID_PREFIX_REGEX}"))?;

        if re.is_match(revision) {
            Ok(Self(revision.to_ascii_lowercase()))
        } else {
            Err(TwigError::CommitNotFound.into())
        }
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        let mut candidates = database.find_commits_by_prefix(&self.0)?;

        match candidates.len() {
            0 => Err(TwigError::CommitNotFound.into()),
            1 => Ok(candidates.remove(0)),
            _ => Err(TwigError::AmbiguousCommitId(self.0.clone()).into()),
        }
    }
}
