//! Domain errors reported to the user
//!
//! Every precondition a command checks maps to one variant here. The `Display`
//! text of each variant is the exact line printed for the user, so the
//! command layer can translate an error into output without any formatting
//! of its own.
//!
//! Infrastructure failures (I/O, corrupt objects) are not part of this enum;
//! they travel as plain `anyhow::Error` values with context attached.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwigError {
    #[error("Please enter a command.")]
    MissingCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Not in an initialized twig directory.")]
    NotInitialized,
    #[error("File does not exist.")]
    FileNotFound,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No commit with that id exists.")]
    CommitNotFound,
    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),
    #[error("Object {0} not found.")]
    ObjectNotFound(String),
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("A branch with that name does not exist.")]
    BranchNotFound,
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,
    #[error("Cannot merge a branch with itself.")]
    SameBranchMerge,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedConflict,
    #[error("Given branch is an ancestor of the current branch.")]
    AncestorMerge,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
}

/// Recover the domain error carried by an `anyhow::Error`, if any.
pub fn as_twig_error(error: &anyhow::Error) -> Option<&TwigError> {
    error.downcast_ref::<TwigError>()
}
