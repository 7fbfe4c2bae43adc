use crate::{DirectoryListing, FileDescriptor, MasterApi, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct ListPathOperation {
    master: Arc<dyn MasterApi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPathOperationOutcome {
    Directory(DirectoryListing),
    File(FileDescriptor),
    NotFound,
}

impl ListPathOperation {
    pub fn new(master: Arc<dyn MasterApi>) -> Self {
        Self { master }
    }

    /// Directory lookup first, then the file descriptor for the same path.
    pub async fn run(&self, path: &str) -> Result<ListPathOperationOutcome> {
        if let Some(listing) = self.master.resolve_directory(path).await? {
            return Ok(ListPathOperationOutcome::Directory(listing));
        }

        if let Some(file) = self.master.resolve_file(path).await? {
            return Ok(ListPathOperationOutcome::File(file));
        }

        Ok(ListPathOperationOutcome::NotFound)
    }
}
