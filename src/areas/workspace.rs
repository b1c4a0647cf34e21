use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::is_recordable_filename;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".twig", ".", ".."];

/// The working directory
///
/// Only plain files directly under the root take part in version control;
/// subdirectories, the `.twig` metadata directory and names containing line
/// breaks are ignored.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the files in the working directory, sorted
    pub fn list_files(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !Self::is_ignored(name))
            .collect())
    }

    // names a commit cannot record are invisible to twig
    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name) || !is_recordable_filename(name)
    }

    /// Whether `filename` names a plain file directly under the root
    pub fn exists(&self, filename: &str) -> bool {
        let is_plain_name = Path::new(filename).file_name() == Some(OsStr::new(filename));

        is_plain_name && !Self::is_ignored(filename) && self.path.join(filename).is_file()
    }

    pub fn read_file(&self, filename: &str) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(filename);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, filename: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(filename)?))
    }

    pub fn write_file(&self, filename: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(filename);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file; a file that is already gone is not an error
    pub fn remove_file(&self, filename: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(filename);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        Ok(())
    }

    // Deletions go first so that nothing the target commit writes is removed
    // afterwards.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for filename in migration.deletions() {
            self.remove_file(filename)?;
        }

        for (filename, blob_id) in migration.writes() {
            let blob = migration.load_blob(blob_id)?;
            self.write_file(filename, blob.content())?;
        }

        tracing::debug!(
            writes = migration.writes().len(),
            deletions = migration.deletions().len(),
            "synced working directory"
        );
        Ok(())
    }
}
