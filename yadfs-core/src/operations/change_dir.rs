use crate::session::SessionContext;
use crate::{MasterApi, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct ChangeDirOperation {
    master: Arc<dyn MasterApi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeDirOperationOutcome {
    Changed(String),
    NotFound(String),
}

impl ChangeDirOperation {
    pub fn new(master: Arc<dyn MasterApi>) -> Self {
        Self { master }
    }

    /// Moves the session only after the master confirms `destination` is a directory.
    /// A failed lookup leaves the working directory untouched.
    pub async fn run(
        &self,
        session: &mut SessionContext,
        destination: &str,
    ) -> Result<ChangeDirOperationOutcome> {
        let destination = session.resolve(destination);

        if self.master.resolve_directory(&destination).await?.is_none() {
            return Ok(ChangeDirOperationOutcome::NotFound(destination));
        }

        session.set_working_dir(destination.clone());
        tracing::debug!("Working directory changed: path={}", destination);
        Ok(ChangeDirOperationOutcome::Changed(destination))
    }
}
