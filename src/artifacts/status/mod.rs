//! Working directory status
//!
//! Compares the head commit, the staging area and the working directory.
//!
//! ## Components
//!
//! - `file_change`: how an unstaged modification shows up
//! - `inspector`: hashes working files without storing them
//! - `status_info`: the classification itself

pub mod file_change;
pub mod inspector;
pub mod status_info;
