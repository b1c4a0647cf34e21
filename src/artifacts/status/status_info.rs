use crate::areas::staging::Staging;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::WorkspaceSnapshot;
use std::collections::{BTreeMap, BTreeSet};

// Terminology:
// - staged files: pending additions
// - removed files: pending removals
// - modified files: tracked or staged content that differs from the working file
// - untracked files: working files the next commit would not contain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) staged: BTreeSet<String>,
    pub(crate) removed: BTreeSet<String>,
    pub(crate) modified: BTreeMap<String, WorkspaceChangeType>,
    pub(crate) untracked: BTreeSet<String>,
}

impl StatusInfo {
    pub fn collect(head: &TrackedFiles, staging: &Staging, workspace: &WorkspaceSnapshot) -> Self {
        let staged = staging.additions().keys().cloned().collect();
        let removed = staging.removals().keys().cloned().collect();

        let mut modified = BTreeMap::new();
        for (filename, staged_id) in staging.additions() {
            match workspace.get(filename) {
                None => {
                    modified.insert(filename.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_id) if working_id != staged_id => {
                    modified.insert(filename.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }
        for (filename, head_id) in head {
            if staging.is_staged_for_addition(filename) || staging.is_staged_for_removal(filename)
            {
                continue;
            }

            match workspace.get(filename) {
                None => {
                    modified.insert(filename.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_id) if working_id != head_id => {
                    modified.insert(filename.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        let untracked = workspace
            .keys()
            .filter(|filename| !staging.is_staged_for_addition(filename))
            .filter(|filename| {
                !head.contains_key(filename.as_str()) || staging.is_staged_for_removal(filename)
            })
            .cloned()
            .collect();

        StatusInfo {
            staged,
            removed,
            modified,
            untracked,
        }
    }

    pub fn staged(&self) -> &BTreeSet<String> {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn modified(&self) -> &BTreeMap<String, WorkspaceChangeType> {
        &self.modified
    }

    pub fn untracked(&self) -> &BTreeSet<String> {
        &self.untracked
    }
}
