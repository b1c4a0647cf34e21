//! A minimal version-control engine
//!
//! Content-addressed blobs and commits, branch references, a staging area
//! and a three-way merge over the commit graph. All state lives in a `.twig`
//! directory at the root of the working directory.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
