//! Commit object
//!
//! A commit is an immutable snapshot: a message, a creation timestamp, up to
//! two parent links and a flat mapping from filename to blob id.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! merge-parent <merge-parent-sha>
//! date <timestamp>
//! file <blob-sha> <filename>
//!
//! <commit message>
//! ```
//!
//! Both parent lines are optional, `file` lines are written in filename
//! order. The commit id is the SHA-1 of this record; the id itself is never
//! part of it.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Filename to blob id mapping recorded by a commit
pub type TrackedFiles = BTreeMap<String, ObjectId>;

/// Message of the root commit every repository starts with
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Display format of commit timestamps, e.g. `Thu Jan 01 00:00:00 1970 +0000`
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Environment variable overriding the creation instant of new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

const COMMIT_TYPE: &str = "commit";

/// Whether a filename fits on a `file` line of the commit record
pub fn is_recordable_filename(filename: &str) -> bool {
    !filename.contains(['\n', '\r'])
}

/// Format a creation instant the way commits record it
pub fn format_timestamp<Tz>(instant: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Timestamp for a commit being created right now
///
/// Reads `TWIG_COMMIT_DATE` (either `%Y-%m-%d %H:%M:%S %z` or RFC 2822) and
/// falls back to the local clock when it is unset.
pub fn load_timestamp_from_env() -> anyhow::Result<String> {
    match std::env::var(COMMIT_DATE_ENV) {
        Ok(date_str) => {
            let instant = chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z")
                .or_else(|_| chrono::DateTime::parse_from_rfc2822(&date_str))
                .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date_str}"))?;
            Ok(format_timestamp(&instant))
        }
        Err(_) => Ok(format_timestamp(&chrono::Local::now().fixed_offset())),
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    message: String,
    timestamp: String,
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    tracked: TrackedFiles,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: String,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        tracked: TrackedFiles,
    ) -> Self {
        Commit {
            message,
            timestamp,
            parent,
            merge_parent,
            tracked,
        }
    }

    /// The root commit of a fresh repository
    ///
    /// Stamped with the Unix epoch so that its id is the same everywhere.
    pub fn initial() -> Self {
        let epoch = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;

        Commit::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            format_timestamp(&epoch),
            None,
            None,
            TrackedFiles::new(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    /// Both parent links, primary first
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.merge_parent.iter())
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn tracked(&self) -> &TrackedFiles {
        &self.tracked
    }

    pub fn blob_for(&self, filename: &str) -> Option<&ObjectId> {
        self.tracked.get(filename)
    }

    fn body(&self) -> String {
        let mut lines = vec![];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent));
        }
        if let Some(merge_parent) = &self.merge_parent {
            lines.push(format!("merge-parent {}", merge_parent));
        }
        lines.push(format!("date {}", self.timestamp));
        for (filename, blob_id) in &self.tracked {
            lines.push(format!("file {} {}", blob_id, filename));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        if let Some(filename) = self
            .tracked
            .keys()
            .find(|filename| !is_recordable_filename(filename))
        {
            anyhow::bail!("Cannot record filename {filename:?}: line breaks are not allowed");
        }
        let body = self.body();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", COMMIT_TYPE, body.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(body.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut header = Vec::new();
        reader.read_until(b'\0', &mut header)?;
        let header = String::from_utf8(header)?;
        let (object_type, size) = header
            .trim_end_matches('\0')
            .split_once(' ')
            .context("Invalid commit object: missing header")?;
        if object_type != COMMIT_TYPE {
            anyhow::bail!("Invalid commit object: unexpected type {}", object_type);
        }
        let size = size
            .parse::<usize>()
            .context("Invalid commit object: invalid size")?;

        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        if content.len() != size {
            anyhow::bail!(
                "Invalid commit object: expected {} bytes, found {}",
                size,
                content.len()
            );
        }

        let (metadata, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parent = None;
        let mut merge_parent = None;
        let mut timestamp = None;
        let mut tracked = TrackedFiles::new();

        for line in metadata.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: malformed line {line:?}"))?;

            match key {
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge-parent" => merge_parent = Some(ObjectId::try_parse(value.to_string())?),
                "date" => timestamp = Some(value.to_string()),
                "file" => {
                    let (blob_id, filename) = value
                        .split_once(' ')
                        .context("Invalid commit object: invalid file line")?;
                    tracked.insert(filename.to_string(), ObjectId::try_parse(blob_id.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown field {}", key),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Ok(Self::new(
            message.to_string(),
            timestamp,
            parent,
            merge_parent,
            tracked,
        ))
    }
}

impl Object for Commit {}
