//! Persistent repository areas
//!
//! - `database`: content-addressed store for blobs and commits
//! - `refs`: branch tips and HEAD
//! - `staging`: pending additions and removals
//! - `repository`: ties the areas together for one command
//! - `workspace`: the working directory

pub mod database;
pub mod refs;
pub mod repository;
pub mod staging;
pub mod workspace;
