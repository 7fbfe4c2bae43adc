use crate::{MasterApi, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct StatusOperation {
    master: Arc<dyn MasterApi>,
}

impl StatusOperation {
    pub fn new(master: Arc<dyn MasterApi>) -> Self {
        Self { master }
    }

    pub async fn run(&self) -> Result<serde_json::Value> {
        self.master.status().await
    }
}
