use super::retrieve_file::{RetrieveFileOperation, RetrieveFileOperationOutcome};
use super::store_file::{StoreFileOperation, StoreFileOperationRequest};
use crate::{FileDescriptor, Result};

/// Retrieve followed by store, buffered entirely in memory.
#[derive(Clone)]
pub struct CopyFileOperation {
    retrieve: RetrieveFileOperation,
    store: StoreFileOperation,
}

#[derive(Debug, Clone)]
pub struct CopyFileOperationRequest {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone)]
pub struct CopyFileOperationResult {
    pub source: FileDescriptor,
    pub destination: FileDescriptor,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub enum CopyFileOperationOutcome {
    Copied(CopyFileOperationResult),
    SourceNotFound,
}

impl CopyFileOperation {
    pub fn new(retrieve: RetrieveFileOperation, store: StoreFileOperation) -> Self {
        Self { retrieve, store }
    }

    pub async fn run(&self, request: CopyFileOperationRequest) -> Result<CopyFileOperationOutcome> {
        let CopyFileOperationRequest {
            source,
            destination,
        } = request;

        let retrieved = match self.retrieve.run(&source).await? {
            RetrieveFileOperationOutcome::Found(retrieved) => retrieved,
            RetrieveFileOperationOutcome::NotFound => {
                return Ok(CopyFileOperationOutcome::SourceNotFound);
            }
        };

        let stored = self
            .store
            .run(StoreFileOperationRequest {
                path: destination,
                body: retrieved.body,
            })
            .await?;

        tracing::info!(
            "Copied file: source={} destination={} size={}",
            source,
            stored.file.path,
            stored.size_bytes
        );

        Ok(CopyFileOperationOutcome::Copied(CopyFileOperationResult {
            source: retrieved.file,
            destination: stored.file,
            size_bytes: stored.size_bytes,
        }))
    }
}
