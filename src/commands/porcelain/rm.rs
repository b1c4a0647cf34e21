use crate::areas::repository::Repository;
use crate::errors::TwigError;

impl Repository {
    pub fn rm(&mut self, filename: &str) -> anyhow::Result<()> {
        let (_, head) = self.head_commit()?;
        let mut staging = self.staging();

        match head.blob_for(filename) {
            Some(blob_id) => {
                staging.stage_removal(filename, blob_id.clone());
                self.workspace().remove_file(filename)?;
            }
            None if staging.unstage(filename) => {}
            None => return Err(TwigError::NothingToRemove.into()),
        }

        staging.write_updates()
    }
}
