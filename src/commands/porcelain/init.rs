use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::TwigError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().commits_path())
            .context("Failed to create .twig/objects/commits directory")?;

        fs::create_dir_all(self.database().blobs_path())
            .context("Failed to create .twig/objects/blobs directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        fs::create_dir_all(self.staging().path())
            .context("Failed to create .twig/staging directory")?;

        self.acquire_lock()?;

        let initial_commit_id = self.database().put_commit(&Commit::initial())?;
        let default_branch = BranchName::default_branch();

        self.refs()
            .set_branch_tip(&default_branch, &initial_commit_id)
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(path = %self.path().display(), "initialized repository");
        Ok(())
    }
}
