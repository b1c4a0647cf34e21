//! Staging area
//!
//! Pending additions and removals consumed by the next commit.
//!
//! ## Layout
//!
//! - `staging/additions/<file>` holds the blob id the file is pinned to
//! - `staging/removals/<file>` holds the blob id being removed
//!
//! A filename is never present in both collections. The area is persisted as
//! a whole: a complete new tree is written under a temporary name and swapped
//! in place of the old one.

use crate::areas::database::generate_temp_name;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

const ADDITIONS_DIR: &str = "additions";
const REMOVALS_DIR: &str = "removals";

#[derive(Debug, Clone)]
pub struct Staging {
    /// Path to the staging directory (typically `.twig/staging`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeMap<String, ObjectId>,
    /// Flag indicating if the area has been modified since loading
    changed: bool,
}

impl Staging {
    pub fn new(path: Box<Path>) -> Self {
        Staging {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the staged entries from disk
    ///
    /// A missing staging directory is an empty staging area.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions = Self::read_entries(&self.path.join(ADDITIONS_DIR))?;
        self.removals = Self::read_entries(&self.path.join(REMOVALS_DIR))?;
        self.changed = false;

        tracing::trace!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "loaded staging area"
        );
        Ok(())
    }

    fn read_entries(dir: &Path) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let mut entries = BTreeMap::new();
        if !dir.is_dir() {
            return Ok(entries);
        }

        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to list staging directory {:?}", dir))?
        {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().to_string();
            let content = std::fs::read_to_string(entry.path())
                .with_context(|| format!("failed to read staging entry {:?}", entry.path()))?;
            let blob_id = ObjectId::try_parse(content.trim().to_string())
                .with_context(|| format!("corrupt staging entry {:?}", entry.path()))?;

            entries.insert(filename, blob_id);
        }

        Ok(entries)
    }

    /// Persist the staged entries if they changed since loading
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let parent = self
            .path
            .parent()
            .with_context(|| format!("invalid staging path {:?}", self.path))?;
        let fresh = parent.join(generate_temp_name());

        Self::write_entries(&fresh.join(ADDITIONS_DIR), &self.additions)?;
        Self::write_entries(&fresh.join(REMOVALS_DIR), &self.removals)?;

        let stale = parent.join(generate_temp_name());
        if self.path.exists() {
            std::fs::rename(&self.path, &stale)
                .with_context(|| format!("failed to retire staging directory {:?}", self.path))?;
        }
        std::fs::rename(&fresh, &self.path)
            .with_context(|| format!("failed to install staging directory {:?}", self.path))?;
        if stale.exists() {
            std::fs::remove_dir_all(&stale)
                .with_context(|| format!("failed to remove old staging directory {:?}", stale))?;
        }

        self.changed = false;
        tracing::debug!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "wrote staging area"
        );
        Ok(())
    }

    fn write_entries(dir: &Path, entries: &BTreeMap<String, ObjectId>) -> anyhow::Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create staging directory {:?}", dir))?;

        for (filename, blob_id) in entries {
            let entry_path = dir.join(filename);
            std::fs::write(&entry_path, blob_id.as_ref())
                .with_context(|| format!("failed to write staging entry {:?}", entry_path))?;
        }

        Ok(())
    }

    /// Pin a file's next-commit content to a blob
    ///
    /// When the blob is the one the head commit already tracks, the file ends
    /// up not staged at all.
    pub fn stage_addition(
        &mut self,
        filename: &str,
        blob_id: ObjectId,
        head_blob_id: Option<&ObjectId>,
    ) {
        self.removals.remove(filename);

        if head_blob_id == Some(&blob_id) {
            self.additions.remove(filename);
        } else {
            self.additions.insert(filename.to_string(), blob_id);
        }

        self.changed = true;
    }

    pub fn stage_removal(&mut self, filename: &str, blob_id: ObjectId) {
        self.additions.remove(filename);
        self.removals.insert(filename.to_string(), blob_id);

        self.changed = true;
    }

    /// Drop a pending addition, returning whether there was one
    ///
    /// Only the staging entry goes away; the blob stays in the object store.
    pub fn unstage(&mut self, filename: &str) -> bool {
        let removed = self.additions.remove(filename).is_some();
        self.changed |= removed;

        removed
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeMap<String, ObjectId> {
        &self.removals
    }

    pub fn is_staged_for_addition(&self, filename: &str) -> bool {
        self.additions.contains_key(filename)
    }

    pub fn is_staged_for_removal(&self, filename: &str) -> bool {
        self.removals.contains_key(filename)
    }

    /// Apply the staged changes on top of a parent's tracked files
    ///
    /// The area is empty afterwards; the caller persists it together with the
    /// commit the result goes into.
    pub fn materialize_onto(&mut self, parent_tracked: &TrackedFiles) -> TrackedFiles {
        let mut tracked = parent_tracked.clone();

        for (filename, blob_id) in std::mem::take(&mut self.additions) {
            tracked.insert(filename, blob_id);
        }
        for filename in std::mem::take(&mut self.removals).into_keys() {
            tracked.remove(&filename);
        }

        self.changed = true;
        tracked
    }
}
