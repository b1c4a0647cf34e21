//! User-facing commands
//!
//! Each command is an `impl Repository` block. A command validates all of
//! its preconditions before it changes anything on disk.
//!
//! ## Commands
//!
//! - `init`: create the repository with its initial commit
//! - `add`, `rm`: stage files
//! - `commit`: turn the staged changes into a commit
//! - `log`: current branch history, every commit, commits by message
//! - `status`: branches, staged changes and working directory state
//! - `checkout`: restore files or switch branches
//! - `branch`: create and delete branches
//! - `reset`: move the current branch to any commit
//! - `merge`: fast-forward or three-way merge another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
