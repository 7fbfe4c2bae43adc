use crate::{
    DatanodeAddress, FileDescriptor, MasterApi, ReplicaRequest, ReplicaResponse,
    ReplicaSetExecutor, Result, StoreReceipt, YadfsError,
};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct StoreFileOperation {
    master: Arc<dyn MasterApi>,
    executor: Arc<ReplicaSetExecutor>,
}

#[derive(Debug, Clone)]
pub struct StoreFileOperationRequest {
    pub path: String,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct StoreFileOperationResult {
    pub file: FileDescriptor,
    pub datanodes: Vec<DatanodeAddress>,
    pub size_bytes: u64,
    pub receipt: StoreReceipt,
}

impl StoreFileOperation {
    pub fn new(master: Arc<dyn MasterApi>, executor: Arc<ReplicaSetExecutor>) -> Self {
        Self { master, executor }
    }

    pub async fn run(&self, request: StoreFileOperationRequest) -> Result<StoreFileOperationResult> {
        let StoreFileOperationRequest { path, body } = request;

        let allocated = match self.master.allocate_file(&path).await {
            Ok(allocated) => allocated,
            Err(error) => {
                tracing::warn!("Store failed: leg=allocate path={} error={}", path, error);
                return Err(error);
            }
        };

        let file = allocated.file;
        let datanodes = allocated.datanodes;
        let size_bytes = body.len() as u64;

        let replicated = self
            .executor
            .execute(&datanodes, &file.file_id, ReplicaRequest::Store(body))
            .await
            .and_then(|response| match response {
                ReplicaResponse::Stored(receipt) => Ok(receipt),
                other => Err(YadfsError::Internal(format!(
                    "store returned {:?}",
                    other
                ))),
            });

        let receipt = match replicated {
            Ok(receipt) => receipt,
            Err(error) => {
                tracing::warn!(
                    "Store failed after allocation: leg=replicate path={} file_id={} error={}",
                    path,
                    file.file_id,
                    error
                );
                return Err(YadfsError::UnwrittenAllocation {
                    path,
                    file_id: file.file_id,
                    source: Box::new(error),
                });
            }
        };

        tracing::info!(
            "Stored file: path={} file_id={} size={} acknowledged={}/{}",
            path,
            file.file_id,
            size_bytes,
            receipt.acknowledged,
            datanodes.len()
        );

        Ok(StoreFileOperationResult {
            file,
            datanodes,
            size_bytes,
            receipt,
        })
    }
}
