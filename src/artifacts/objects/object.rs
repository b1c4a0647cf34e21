use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// A content-addressed object
///
/// The identity of an object is the SHA-1 digest of its serialized form.
/// Nothing outside the serialized bytes may enter the digest, so two objects
/// with the same content always share an id.
pub trait Object: Packable {
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(digest(&content))
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// SHA-1 digest of raw bytes as an object id
pub fn digest(content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(content);

    // a hex-encoded SHA-1 is always 40 valid hex digits
    ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap_or_default()
}
