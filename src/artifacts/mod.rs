//! Version-control data structures and algorithms
//!
//! - `branch`: branch names and commit id prefixes
//! - `checkout`: checkout targets, the untracked-file guard, working directory sync
//! - `core`: terminal output helpers
//! - `log`: history traversal
//! - `merge`: split point search and per-file resolution
//! - `objects`: blobs and commits
//! - `status`: working directory status

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
