//! Content-addressed object store
//!
//! Blobs and commits live in two separate stores under `.twig/objects`, each
//! fanned out on the first two characters of the id. Writing an object whose
//! id is already present is a no-op, so identical content is stored once.
//! Objects are never deleted.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

const BLOBS_DIR: &str = "blobs";
const COMMITS_DIR: &str = "commits";

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn blobs_path(&self) -> PathBuf {
        self.path.join(BLOBS_DIR)
    }

    pub fn commits_path(&self) -> PathBuf {
        self.path.join(COMMITS_DIR)
    }

    pub fn put_blob(&self, blob: &Blob) -> anyhow::Result<ObjectId> {
        self.store(self.blobs_path(), blob)
    }

    pub fn get_blob(&self, blob_id: &ObjectId) -> anyhow::Result<Blob> {
        let content = self.read_object(self.blobs_path(), blob_id)?;
        Blob::deserialize(Cursor::new(content))
    }

    pub fn has_blob(&self, blob_id: &ObjectId) -> bool {
        self.blobs_path().join(blob_id.to_path()).is_file()
    }

    pub fn put_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        self.store(self.commits_path(), commit)
    }

    pub fn get_commit(&self, commit_id: &ObjectId) -> anyhow::Result<Commit> {
        let content = self.read_object(self.commits_path(), commit_id)?;
        Commit::deserialize(Cursor::new(content))
            .with_context(|| format!("Unable to parse commit {}", commit_id))
    }

    /// Every commit id in the store, in id order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        Self::list_objects(&self.commits_path())
    }

    /// Every blob id in the store, in id order
    pub fn list_blobs(&self) -> anyhow::Result<Vec<ObjectId>> {
        Self::list_objects(&self.blobs_path())
    }

    /// Find all commits whose id starts with the given prefix.
    ///
    /// Used to resolve abbreviated commit ids. For prefixes of two or more
    /// characters only the matching fan-out directory is scanned.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() < 2 {
            return Ok(self
                .list_commits()?
                .into_iter()
                .filter(|oid| oid.starts_with(&prefix))
                .collect());
        }

        let dir_path = self.commits_path().join(&prefix[..2]);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list {}", dir_path.display()))?
        {
            let entry = entry?;
            let full_oid = format!("{}{}", &prefix[..2], entry.file_name().to_string_lossy());

            if full_oid.starts_with(&prefix)
                && let Ok(oid) = ObjectId::try_parse(full_oid)
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    fn list_objects(store_path: &Path) -> anyhow::Result<Vec<ObjectId>> {
        if !store_path.exists() {
            return Ok(Vec::new());
        }

        let mut oids = WalkDir::new(store_path)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let dir = entry.path().parent()?.file_name()?.to_string_lossy().to_string();
                let file = entry.file_name().to_string_lossy().to_string();
                ObjectId::try_parse(format!("{dir}{file}")).ok()
            })
            .collect::<Vec<_>>();
        oids.sort();

        Ok(oids)
    }

    fn store(&self, store_path: PathBuf, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = store_path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            let object_dir = object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?;
            std::fs::create_dir_all(object_dir).context(format!(
                "Unable to create object directory {}",
                object_dir.display()
            ))?;

            write_atomically(&object_path, &object.serialize()?)?;
            tracing::debug!(oid = %object_id, path = %object_path.display(), "stored object");
        }

        Ok(object_id)
    }

    fn read_object(&self, store_path: PathBuf, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = store_path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(TwigError::ObjectNotFound(object_id.to_string()).into());
        }

        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(content.into())
    }
}

/// Write a file through a temporary sibling and a rename
///
/// Readers never observe a partially written file.
pub fn write_atomically(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .context(format!("Invalid file path {}", path.display()))?;
    let temp_path = dir.join(generate_temp_name());

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .context(format!("Unable to open file {}", temp_path.display()))?;

    file.write_all(content)
        .context(format!("Unable to write file {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .context(format!("Unable to rename file to {}", path.display()))?;

    Ok(())
}

pub fn generate_temp_name() -> String {
    format!("tmp-obj-{}", rand::random::<u32>())
}

/// Memoizing commit loader
///
/// Graph walks visit the same commit from several descendants; the cache
/// makes each commit hit the disk once per command.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: RefCell<HashMap<ObjectId, Rc<Commit>>>,
}

impl CommitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        database: &Database,
        commit_id: &ObjectId,
    ) -> anyhow::Result<Rc<Commit>> {
        if let Some(commit) = self.commits.borrow().get(commit_id) {
            return Ok(commit.clone());
        }

        let commit = Rc::new(database.get_commit(commit_id)?);
        self.commits
            .borrow_mut()
            .insert(commit_id.clone(), commit.clone());

        Ok(commit)
    }
}
