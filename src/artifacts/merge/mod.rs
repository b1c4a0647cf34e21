//! Three-way merge
//!
//! - `split_point`: nearest common ancestor of two branch tips
//! - `resolution`: per-file decision table and conflict content

pub mod resolution;
pub mod split_point;

/// How a merge that went ahead ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch tip moved to the given tip; nothing was committed
    FastForward,
    /// A merge commit was created
    Merged { conflicted: bool },
}
