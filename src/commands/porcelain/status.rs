use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::status::status_info::StatusInfo;
use colored::Colorize;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let current_branch = self.refs().read_head()?;
        let branches = self.refs().list_branches()?;
        let (_, head) = self.head_commit()?;
        let workspace = Inspector::new(self.workspace()).snapshot()?;
        let status = StatusInfo::collect(head.tracked(), &self.staging(), &workspace);

        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch in branches {
            if branch == current_branch {
                writeln!(writer, "{}", format!("*{}", branch).green())?;
            } else {
                writeln!(writer, "{}", branch)?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for filename in status.staged() {
            writeln!(writer, "{}", filename)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for filename in status.removed() {
            writeln!(writer, "{}", filename)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (filename, change) in status.modified() {
            writeln!(writer, "{} {}", filename, change)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for filename in status.untracked() {
            writeln!(writer, "{}", filename)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
