use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::guard_untracked;
use crate::artifacts::log::rev_list::is_ancestor;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::resolution::{FileResolution, conflict_blob, resolve};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use std::collections::BTreeSet;

impl Repository {
    pub fn merge(&mut self, given: &str) -> anyhow::Result<MergeOutcome> {
        if !self.staging().is_empty() {
            return Err(TwigError::UncommittedChanges.into());
        }

        let given_branch =
            BranchName::try_parse(given.to_string()).map_err(|_| TwigError::BranchNotFound)?;
        if !self.refs().branch_exists(&given_branch) {
            return Err(TwigError::BranchNotFound.into());
        }
        let current_branch = self.refs().read_head()?;
        if given_branch == current_branch {
            return Err(TwigError::SameBranchMerge.into());
        }

        let (head_id, head) = self.head_commit()?;
        let given_id = self.refs().read_branch_tip(&given_branch)?;
        let given_commit = self.load_commit(&given_id)?;

        guard_untracked(
            &self.workspace().list_files()?,
            &self.staging(),
            head.tracked(),
            given_commit.tracked(),
        )?;

        let load_parents = |oid: &ObjectId| self.load_parents(oid);

        if is_ancestor(&load_parents, &given_id, &head_id)? {
            return Err(TwigError::AncestorMerge.into());
        }
        if is_ancestor(&load_parents, &head_id, &given_id)? {
            self.switch_to_commit(&given_id)?;
            self.refs().set_branch_tip(&current_branch, &given_id)?;
            writeln!(self.writer(), "Current branch fast-forwarded.")?;

            tracing::info!(branch = %current_branch, oid = %given_id, "fast-forwarded");
            return Ok(MergeOutcome::FastForward);
        }

        let split_id = SplitPointFinder::new(&load_parents)
            .find(&head_id, &given_id)?
            .with_context(|| format!("no common ancestor of {} and {}", head_id, given_id))?;
        let split = self.load_commit(&split_id)?;

        let filenames = split
            .tracked()
            .keys()
            .chain(head.tracked().keys())
            .chain(given_commit.tracked().keys())
            .collect::<BTreeSet<_>>();

        let mut conflicted = false;
        {
            let mut staging = self.staging();

            for filename in filenames {
                let head_blob_id = head.blob_for(filename);
                let resolution = resolve(
                    split.blob_for(filename),
                    head_blob_id,
                    given_commit.blob_for(filename),
                );
                tracing::debug!(file = %filename, ?resolution, "classified file");

                match resolution {
                    FileResolution::KeepHead => {}
                    FileResolution::TakeGiven(Some(blob_id)) => {
                        let blob = self.database().get_blob(&blob_id)?;
                        self.workspace().write_file(filename, blob.content())?;
                        staging.stage_addition(filename, blob_id, head_blob_id);
                    }
                    FileResolution::TakeGiven(None) => {
                        if let Some(blob_id) = head_blob_id {
                            staging.stage_removal(filename, blob_id.clone());
                        }
                        self.workspace().remove_file(filename)?;
                    }
                    FileResolution::Conflict => {
                        let head_blob = head_blob_id
                            .map(|blob_id| self.database().get_blob(blob_id))
                            .transpose()?;
                        let given_blob = given_commit
                            .blob_for(filename)
                            .map(|blob_id| self.database().get_blob(blob_id))
                            .transpose()?;

                        let blob = conflict_blob(head_blob.as_ref(), given_blob.as_ref());
                        let blob_id = self.database().put_blob(&blob)?;
                        self.workspace().write_file(filename, blob.content())?;
                        staging.stage_addition(filename, blob_id, head_blob_id);

                        conflicted = true;
                    }
                }
            }
        }

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        let message = format!("Merged {} into {}.", given_branch, current_branch);
        self.write_commit(message, Some(given_id))?;

        Ok(MergeOutcome::Merged { conflicted })
    }
}
