use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;

impl Repository {
    pub fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        let commit_id = Revision::try_parse(revision)?.resolve(self.database())?;
        let branch = self.refs().read_head()?;

        self.switch_to_commit(&commit_id)?;
        self.refs().set_branch_tip(&branch, &commit_id)?;

        tracing::info!(branch = %branch, oid = %commit_id, "reset branch");
        Ok(())
    }
}
