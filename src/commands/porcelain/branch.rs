use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::TwigError;

impl Repository {
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head_id = self.refs().read_head_tip()?;

        self.refs().create_branch(&branch_name, &head_id)
    }

    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        // a name that could never be a branch is simply not there
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| TwigError::BranchNotFound)?;

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
