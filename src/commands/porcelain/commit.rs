use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, load_timestamp_from_env};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }
        if self.staging().is_empty() {
            return Err(TwigError::NothingToCommit.into());
        }

        self.write_commit(message.to_string(), None)
    }

    /// Turn the staged changes into a commit on top of the current branch
    ///
    /// The commit is stored before the branch moves, and the staging area is
    /// emptied only once the branch points at the new commit.
    pub(crate) fn write_commit(
        &self,
        message: String,
        merge_parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let branch = self.refs().read_head()?;
        let (head_id, head) = self.head_commit()?;

        let mut staging = self.staging();
        let tracked = staging.materialize_onto(head.tracked());

        let commit = Commit::new(
            message,
            load_timestamp_from_env()?,
            Some(head_id),
            merge_parent,
            tracked,
        );
        let commit_id = self.database().put_commit(&commit)?;

        self.refs().set_branch_tip(&branch, &commit_id)?;
        staging.write_updates()?;

        tracing::info!(branch = %branch, oid = %commit_id, "created commit");
        Ok(commit_id)
    }
}
