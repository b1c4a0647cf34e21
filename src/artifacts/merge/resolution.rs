//! Per-file three-way decision
//!
//! Each file is judged by its blob id (or absence) at the split point `S`,
//! the head `H` and the given tip `G`:
//!
//! | condition              | resolution                    |
//! |------------------------|-------------------------------|
//! | `H == G`               | keep head                     |
//! | `H == S`, `G != S`     | take given (write or delete)  |
//! | `G == S`, `H != S`     | keep head                     |
//! | otherwise              | conflict                      |
//!
//! Both sides making the same change never conflicts.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, BytesMut};

pub const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_END_MARKER: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResolution {
    KeepHead,
    /// Adopt the given side; `None` means the file goes away
    TakeGiven(Option<ObjectId>),
    Conflict,
}

pub fn resolve(
    split: Option<&ObjectId>,
    head: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> FileResolution {
    if head == given {
        FileResolution::KeepHead
    } else if head == split {
        FileResolution::TakeGiven(given.cloned())
    } else if given == split {
        FileResolution::KeepHead
    } else {
        FileResolution::Conflict
    }
}

/// Both versions of a conflicting file between conflict markers
///
/// A side that does not have the file contributes nothing.
pub fn conflict_blob(head: Option<&Blob>, given: Option<&Blob>) -> Blob {
    let mut content = BytesMut::new();

    content.put_slice(CONFLICT_HEAD_MARKER.as_bytes());
    if let Some(head) = head {
        content.put_slice(head.content());
    }
    content.put_slice(CONFLICT_SEPARATOR.as_bytes());
    if let Some(given) = given {
        content.put_slice(given.content());
    }
    content.put_slice(CONFLICT_END_MARKER.as_bytes());

    Blob::new(content.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::digest;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn id(name: &str) -> ObjectId {
        digest(name.as_bytes())
    }

    #[rstest]
    #[case::only_given_changed(Some("x"), Some("x"), Some("z"), FileResolution::TakeGiven(Some(id("z"))))]
    #[case::only_given_deleted(Some("x"), Some("x"), None, FileResolution::TakeGiven(None))]
    #[case::only_given_added(None, None, Some("z"), FileResolution::TakeGiven(Some(id("z"))))]
    #[case::only_head_changed(Some("x"), Some("y"), Some("x"), FileResolution::KeepHead)]
    #[case::only_head_deleted(Some("x"), None, Some("x"), FileResolution::KeepHead)]
    #[case::only_head_added(None, Some("y"), None, FileResolution::KeepHead)]
    #[case::same_change(Some("x"), Some("y"), Some("y"), FileResolution::KeepHead)]
    #[case::same_addition(None, Some("y"), Some("y"), FileResolution::KeepHead)]
    #[case::both_deleted(Some("x"), None, None, FileResolution::KeepHead)]
    #[case::different_changes(Some("x"), Some("y"), Some("z"), FileResolution::Conflict)]
    #[case::different_additions(None, Some("y"), Some("z"), FileResolution::Conflict)]
    #[case::head_changed_given_deleted(Some("x"), Some("y"), None, FileResolution::Conflict)]
    #[case::head_deleted_given_changed(Some("x"), None, Some("z"), FileResolution::Conflict)]
    fn decision_table(
        #[case] split: Option<&str>,
        #[case] head: Option<&str>,
        #[case] given: Option<&str>,
        #[case] expected: FileResolution,
    ) {
        let split = split.map(id);
        let head = head.map(id);
        let given = given.map(id);

        assert_eq!(
            resolve(split.as_ref(), head.as_ref(), given.as_ref()),
            expected
        );
    }

    #[test]
    fn conflict_content_concatenates_both_sides() {
        let blob = conflict_blob(Some(&Blob::from("y")), Some(&Blob::from("z")));

        assert_eq!(blob.content_lossy(), "<<<<<<< HEAD\ny=======\nz>>>>>>>\n");
    }

    #[test]
    fn missing_side_contributes_nothing() {
        let blob = conflict_blob(Some(&Blob::from("y\n")), None);

        assert_eq!(blob.content_lossy(), "<<<<<<< HEAD\ny\n=======\n>>>>>>>\n");
    }

    proptest! {
        #[test]
        fn identical_sides_never_conflict(
            split in proptest::option::of("[a-z]{1,4}"),
            side in proptest::option::of("[a-z]{1,4}"),
        ) {
            let split = split.as_deref().map(id);
            let side = side.as_deref().map(id);

            prop_assert_eq!(
                resolve(split.as_ref(), side.as_ref(), side.as_ref()),
                FileResolution::KeepHead
            );
        }
    }
}
