use crate::areas::database::{CommitCache, Database};
use crate::areas::refs::Refs;
use crate::areas::staging::Staging;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use file_guard::{FileGuard, Lock};
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Name of the metadata directory at the root of the working directory
pub const METADATA_DIR: &str = ".twig";

const LOCK_FILE: &str = "lock";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    staging: RefCell<Staging>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    commits: CommitCache,
    lock: Option<FileGuard<Box<File>>>,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve working directory {:?}", path))?;
        let metadata_path = path.join(METADATA_DIR);

        let staging = Staging::new(metadata_path.join("staging").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            staging: RefCell::new(staging),
            database,
            workspace,
            refs,
            commits: CommitCache::new(),
            lock: None,
        })
    }

    /// Open an existing repository for one command
    ///
    /// Holds the repository lock until the value is dropped and loads the
    /// staging area.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let mut repository = Self::new(path, writer)?;

        if !repository.is_initialized() {
            return Err(TwigError::NotInitialized.into());
        }

        repository.acquire_lock()?;
        repository.staging().rehydrate()?;

        Ok(repository)
    }

    pub fn acquire_lock(&mut self) -> anyhow::Result<()> {
        let lock_path = self.lock_path();
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {:?}", lock_path))?;

        let guard = file_guard::lock(Box::new(file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("failed to lock {:?}", lock_path))?;
        tracing::trace!(path = ?lock_path, "acquired repository lock");

        self.lock = Some(guard);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.metadata_path().join(LOCK_FILE)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn staging(&'_ self) -> RefMut<'_, Staging> {
        self.staging.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn load_commit(&self, commit_id: &ObjectId) -> anyhow::Result<Rc<Commit>> {
        self.commits.get_or_load(&self.database, commit_id)
    }

    /// Id and content of the commit the current branch points to
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Rc<Commit>)> {
        let head_id = self.refs.read_head_tip()?;
        let commit = self.load_commit(&head_id)?;

        Ok((head_id, commit))
    }

    /// Parent links of a commit, for graph walks
    pub fn load_parents(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self.load_commit(commit_id)?.parents().cloned().collect())
    }
}
