use crate::areas::repository::Repository;
use crate::errors::TwigError;

impl Repository {
    pub fn add(&mut self, filename: &str) -> anyhow::Result<()> {
        if !self.workspace().exists(filename) {
            return Err(TwigError::FileNotFound.into());
        }

        let (_, head) = self.head_commit()?;
        let blob = self.workspace().parse_blob(filename)?;
        let blob_id = self.database().put_blob(&blob)?;

        let mut staging = self.staging();
        staging.stage_addition(filename, blob_id, head.blob_for(filename));
        staging.write_updates()?;

        Ok(())
    }
}
