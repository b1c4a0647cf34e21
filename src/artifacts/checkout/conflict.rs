use crate::areas::staging::Staging;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::errors::TwigError;
use std::collections::BTreeSet;

/// Working files that a switch to `incoming` would clobber
///
/// A file is in the way when it is neither staged for addition nor tracked
/// by the current commit, yet the incoming commit tracks a file of that name.
pub fn untracked_in_the_way(
    workspace_files: &BTreeSet<String>,
    staging: &Staging,
    current: &TrackedFiles,
    incoming: &TrackedFiles,
) -> Vec<String> {
    workspace_files
        .iter()
        .filter(|filename| !staging.is_staged_for_addition(filename))
        .filter(|filename| !current.contains_key(filename.as_str()))
        .filter(|filename| incoming.contains_key(filename.as_str()))
        .cloned()
        .collect()
}

pub fn guard_untracked(
    workspace_files: &BTreeSet<String>,
    staging: &Staging,
    current: &TrackedFiles,
    incoming: &TrackedFiles,
) -> anyhow::Result<()> {
    let in_the_way = untracked_in_the_way(workspace_files, staging, current, incoming);

    if in_the_way.is_empty() {
        Ok(())
    } else {
        tracing::debug!(files = ?in_the_way, "untracked files block the switch");
        Err(TwigError::UntrackedConflict.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::digest;
    use crate::errors::as_twig_error;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn files(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn tracked(names: &[&str]) -> TrackedFiles {
        names
            .iter()
            .map(|name| (name.to_string(), digest(name.as_bytes())))
            .collect()
    }

    fn staging() -> Staging {
        Staging::new(Path::new("/nonexistent/staging").into())
    }

    #[test]
    fn only_untracked_files_the_target_writes_are_in_the_way() {
        let workspace = files(&["tracked.txt", "stray.txt", "clash.txt"]);

        let in_the_way = untracked_in_the_way(
            &workspace,
            &staging(),
            &tracked(&["tracked.txt"]),
            &tracked(&["tracked.txt", "clash.txt"]),
        );

        assert_eq!(in_the_way, vec!["clash.txt".to_string()]);
    }

    #[test]
    fn staged_files_are_not_in_the_way() {
        let mut staging = staging();
        staging.stage_addition("clash.txt", digest(b"local"), None);

        let result = guard_untracked(
            &files(&["clash.txt"]),
            &staging,
            &TrackedFiles::new(),
            &tracked(&["clash.txt"]),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn guard_reports_untracked_conflict() {
        let error = guard_untracked(
            &files(&["clash.txt"]),
            &staging(),
            &TrackedFiles::new(),
            &tracked(&["clash.txt"]),
        )
        .unwrap_err();

        assert_eq!(as_twig_error(&error), Some(&TwigError::UntrackedConflict));
    }
}
