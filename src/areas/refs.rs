//! Branch references and HEAD
//!
//! Branches are named pointers to commit ids; HEAD names the branch that is
//! currently checked out. HEAD is always symbolic here: there is no detached
//! state.
//!
//! ## File Format
//!
//! - `HEAD` contains `ref: refs/heads/<branch>`
//! - `refs/heads/<branch>` contains a 40-character commit id
//!
//! Every update is written through a temporary file and renamed into place.

use crate::areas::database::write_atomically;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    /// Name of the branch HEAD points to
    pub fn read_head(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a symbolic ref: {content:?}"))?;

        BranchName::try_parse_ref_path(&symref_match[1])
    }

    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        let raw_ref = format!("ref: {}", branch_name.to_ref_path());
        self.update_ref_file(&self.head_path(), &raw_ref)?;

        tracing::debug!(branch = %branch_name, "moved HEAD");
        Ok(())
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.read_head()? == branch_name)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch_tip(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Err(TwigError::NoSuchBranch.into());
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        ObjectId::try_parse(content.trim().to_string())
            .with_context(|| format!("corrupt ref file at {:?}", branch_path))
    }

    /// Tip of the branch HEAD points to
    pub fn read_head_tip(&self) -> anyhow::Result<ObjectId> {
        self.read_branch_tip(&self.read_head()?)
    }

    /// Point a branch at a commit, creating the branch if needed
    pub fn set_branch_tip(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch_name), oid.as_ref())?;

        tracing::debug!(branch = %branch_name, oid = %oid, "updated branch tip");
        Ok(())
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(TwigError::BranchAlreadyExists.into());
        }

        self.set_branch_tip(branch_name, oid)
    }

    /// Delete a branch pointer
    ///
    /// The commits it pointed to are left untouched. Deleting the checked-out
    /// branch or a branch that does not exist fails.
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.branch_exists(branch_name) {
            return Err(TwigError::BranchNotFound.into());
        }
        if self.is_current_branch(branch_name)? {
            return Err(TwigError::RemoveCurrentBranch.into());
        }

        let branch_path = self.branch_path(branch_name);
        let oid = self.read_branch_tip(branch_name)?;

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        tracing::debug!(branch = %branch_name, "deleted branch");
        Ok(oid)
    }

    pub fn list_branches(&self) -> anyhow::Result<BTreeSet<BranchName>> {
        let heads_path = self.heads_path();

        WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                Some(BranchName::try_parse(name))
            })
            .collect()
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", path)
        })?)?;

        write_atomically(path, raw_ref.as_bytes())
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> PathBuf {
        self.path.join(branch_name.to_ref_path())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::digest;
    use crate::errors::as_twig_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_branch_tip(&branch("master"), &digest(b"root")).unwrap();
        refs.set_head(&branch("master")).unwrap();
        (dir, refs)
    }

    #[rstest]
    fn head_round_trips(refs: (TempDir, Refs)) {
        let (dir, refs) = refs;

        assert_eq!(refs.read_head().unwrap(), branch("master"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("HEAD")).unwrap(),
            "ref: refs/heads/master"
        );
        assert_eq!(refs.read_head_tip().unwrap(), digest(b"root"));
    }

    #[rstest]
    fn missing_branch_is_reported(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.read_branch_tip(&branch("nope")).unwrap_err();

        assert_eq!(as_twig_error(&error), Some(&TwigError::NoSuchBranch));
    }

    #[rstest]
    fn duplicate_branch_is_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.create_branch(&branch("master"), &digest(b"x")).unwrap_err();

        assert_eq!(as_twig_error(&error), Some(&TwigError::BranchAlreadyExists));
    }

    #[rstest]
    fn current_branch_cannot_be_deleted(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("master")).unwrap_err();

        assert_eq!(as_twig_error(&error), Some(&TwigError::RemoveCurrentBranch));
        assert!(refs.branch_exists(&branch("master")));
    }

    #[rstest]
    fn deleting_unknown_branch_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("ghost")).unwrap_err();

        assert_eq!(as_twig_error(&error), Some(&TwigError::BranchNotFound));
    }

    #[rstest]
    fn hierarchical_branches_are_listed_and_pruned(refs: (TempDir, Refs)) {
        let (dir, refs) = refs;
        refs.create_branch(&branch("feature/login"), &digest(b"root")).unwrap();
        refs.create_branch(&branch("dev"), &digest(b"root")).unwrap();

        assert_eq!(
            refs.list_branches().unwrap().into_iter().collect::<Vec<_>>(),
            vec![branch("dev"), branch("feature/login"), branch("master")]
        );

        assert_eq!(
            refs.delete_branch(&branch("feature/login")).unwrap(),
            digest(b"root")
        );
        assert!(!dir.path().join("refs/heads/feature").exists());
    }
}
