//! Working-directory migration between two commits
//!
//! The plan is computed up front from the two tracked maps and applied by
//! [`Workspace::apply_migration`](crate::areas::workspace::Workspace::apply_migration).

use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;

pub struct Migration<'r> {
    database: &'r Database,
    /// Every file of the target commit, overwriting whatever is on disk
    writes: TrackedFiles,
    /// Files tracked now but not by the target
    deletions: BTreeSet<String>,
}

impl<'r> Migration<'r> {
    pub fn plan(database: &'r Database, current: &TrackedFiles, target: &TrackedFiles) -> Self {
        let deletions = current
            .keys()
            .filter(|filename| !target.contains_key(filename.as_str()))
            .cloned()
            .collect();

        Self {
            database,
            writes: target.clone(),
            deletions,
        }
    }

    pub fn writes(&self) -> &TrackedFiles {
        &self.writes
    }

    pub fn deletions(&self) -> &BTreeSet<String> {
        &self.deletions
    }

    pub fn load_blob(&self, blob_id: &ObjectId) -> anyhow::Result<Blob> {
        self.database.get_blob(blob_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::workspace::Workspace;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn switching_commits_rewrites_and_deletes_tracked_files() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join(".twig/objects").into_boxed_path());
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let one = database.put_blob(&Blob::from("1")).unwrap();
        let two = database.put_blob(&Blob::from("2")).unwrap();
        let current = TrackedFiles::from([
            ("a.txt".to_string(), one.clone()),
            ("gone.txt".to_string(), one.clone()),
        ]);
        let target = TrackedFiles::from([
            ("a.txt".to_string(), two),
            ("new.txt".to_string(), one),
        ]);
        dir.child("a.txt").write_str("1").unwrap();
        dir.child("gone.txt").write_str("1").unwrap();
        dir.child("untracked.txt").write_str("keep me").unwrap();

        let migration = Migration::plan(&database, &current, &target);
        workspace.apply_migration(&migration).unwrap();

        assert_eq!(migration.deletions().iter().collect::<Vec<_>>(), vec!["gone.txt"]);
        dir.child("a.txt").assert("2");
        dir.child("new.txt").assert("1");
        dir.child("gone.txt").assert(predicates::path::missing());
        dir.child("untracked.txt").assert("keep me");
    }
}
