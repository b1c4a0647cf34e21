//! Checkout targets and working-directory sync
//!
//! Switching the working directory to another commit happens in two steps:
//! the untracked-file guard runs first and refuses before anything is
//! written, then a migration deletes files the target does not track and
//! writes every file it does.

pub mod conflict;
pub mod migration;

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;

/// What `checkout` restores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// One file from the head commit
    File(String),
    /// One file from an arbitrary commit
    CommitFile(Revision, String),
    /// A whole branch, which also becomes the head
    Branch(BranchName),
}
