use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// History of the current branch, following first parents
    pub fn log(&self) -> anyhow::Result<()> {
        let head_id = self.refs().read_head_tip()?;

        for entry in RevList::new(self.database(), head_id) {
            let (commit_id, commit) = entry?;
            self.show_commit(&commit_id, &commit)?;
        }

        Ok(())
    }

    /// Every commit ever made, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_id in self.database().list_commits()? {
            let commit = self.load_commit(&commit_id)?;
            self.show_commit(&commit_id, &commit)?;
        }

        Ok(())
    }

    /// Ids of the commits whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for commit_id in self.database().list_commits()? {
            if self.load_commit(&commit_id)?.message() == message {
                writeln!(self.writer(), "{}", commit_id)?;
                found = true;
            }
        }

        if found {
            Ok(())
        } else {
            Err(TwigError::NoCommitWithMessage.into())
        }
    }

    fn show_commit(&self, commit_id: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", commit_id)?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
