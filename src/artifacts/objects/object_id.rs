//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 40-character lowercase hexadecimal strings. Blobs and
//! commits share the same identifier type; which store an id belongs to is
//! decided by the caller.
//!
//! ## Storage
//!
//! Objects are stored under `<store>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::path::PathBuf;

/// Length of the abbreviated form used in `Merge:` log lines
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;

/// SHA-1 digest identifying a blob or a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase digits are normalized to lowercase so that ids read back
    /// from disk compare equal to freshly computed ones.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("Invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid object ID characters: {}", id);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Convert to the fan-out path used inside an object store
    ///
    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> String {
        self.0[..SHORT_OBJECT_ID_LENGTH].to_string()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(&prefix.to_ascii_lowercase())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn any_forty_hex_digits_parse(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            assert_eq!(oid.as_ref(), id);
        }

        #[test]
        fn wrong_length_is_rejected(id in "[0-9a-f]{1,39}") {
            assert!(ObjectId::try_parse(id).is_err());
        }
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let id = "z".repeat(OBJECT_ID_LENGTH);
        assert!(ObjectId::try_parse(id).is_err());
    }

    #[test]
    fn path_fans_out_on_first_two_characters() {
        let oid = ObjectId::try_parse(format!("ab{}", "0".repeat(38))).unwrap();
        assert_eq!(oid.to_path(), PathBuf::from("ab").join("0".repeat(38)));
        assert_eq!(oid.to_short_oid(), "ab00000");
    }

    #[test]
    fn uppercase_ids_are_normalized() {
        let oid = ObjectId::try_parse("AB".repeat(20)).unwrap();
        assert_eq!(oid.as_ref(), "ab".repeat(20));
        assert!(oid.starts_with("ABAB"));
    }
}
