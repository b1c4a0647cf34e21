use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeMap;

/// Working files keyed by name, with the blob id their content would get
pub type WorkspaceSnapshot = BTreeMap<String, ObjectId>;

#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl Inspector<'_> {
    /// Hash every working file; nothing is written to the object store
    pub fn snapshot(&self) -> anyhow::Result<WorkspaceSnapshot> {
        self.workspace
            .list_files()?
            .into_iter()
            .map(|filename| {
                let blob_id = self.workspace.parse_blob(&filename)?.object_id()?;
                Ok((filename, blob_id))
            })
            .collect()
    }
}
