//! Command implementations
//!
//! Only porcelain commands exist; the object store, refs and staging area
//! are not exposed on the command line directly.

pub mod porcelain;
