use crate::{MasterApi, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct MakeDirOperation {
    master: Arc<dyn MasterApi>,
}

impl MakeDirOperation {
    pub fn new(master: Arc<dyn MasterApi>) -> Self {
        Self { master }
    }

    pub async fn run(&self, path: &str) -> Result<()> {
        self.master.create_directory(path).await?;
        tracing::info!("Created directory: path={}", path);
        Ok(())
    }
}
