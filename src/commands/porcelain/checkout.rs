use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::CheckoutTarget;
use crate::artifacts::checkout::conflict::guard_untracked;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    pub fn checkout(&mut self, target: CheckoutTarget) -> anyhow::Result<()> {
        match target {
            CheckoutTarget::File(filename) => {
                let (_, head) = self.head_commit()?;
                self.restore_file(&head, &filename)
            }
            CheckoutTarget::CommitFile(revision, filename) => {
                let commit_id = revision.resolve(self.database())?;
                let commit = self.load_commit(&commit_id)?;
                self.restore_file(&commit, &filename)
            }
            CheckoutTarget::Branch(branch_name) => self.checkout_branch(&branch_name),
        }
    }

    fn restore_file(&self, commit: &Commit, filename: &str) -> anyhow::Result<()> {
        let blob_id = commit
            .blob_for(filename)
            .ok_or(TwigError::FileNotInCommit)?;
        let blob = self.database().get_blob(blob_id)?;

        self.workspace().write_file(filename, blob.content())
    }

    fn checkout_branch(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        if !self.refs().branch_exists(branch_name) {
            return Err(TwigError::NoSuchBranch.into());
        }
        if self.refs().is_current_branch(branch_name)? {
            return Err(TwigError::AlreadyOnBranch.into());
        }

        let target_id = self.refs().read_branch_tip(branch_name)?;
        self.switch_to_commit(&target_id)?;
        self.refs().set_head(branch_name)?;

        tracing::info!(branch = %branch_name, "switched branch");
        Ok(())
    }

    /// Make the working directory match a commit and empty the staging area
    ///
    /// Refuses before touching anything when an untracked file would be
    /// overwritten.
    pub(crate) fn switch_to_commit(&self, target_id: &ObjectId) -> anyhow::Result<()> {
        let (_, head) = self.head_commit()?;
        let target = self.load_commit(target_id)?;
        let mut staging = self.staging();

        guard_untracked(
            &self.workspace().list_files()?,
            &staging,
            head.tracked(),
            target.tracked(),
        )?;

        let migration = Migration::plan(self.database(), head.tracked(), target.tracked());
        self.workspace().apply_migration(&migration)?;

        staging.clear();
        staging.write_updates()
    }
}
