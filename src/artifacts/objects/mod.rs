//! Object types
//!
//! Everything the repository stores is content-addressed by a SHA-1 digest:
//!
//! - **Blob**: raw file content
//! - **Commit**: snapshot with message, timestamp, parent links and tracked files
//!
//! Both implement serialization through the `Packable`/`Unpackable` traits
//! and derive their id from the serialized bytes via `Object`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
