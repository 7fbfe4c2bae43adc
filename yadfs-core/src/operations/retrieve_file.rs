use crate::{
    FileDescriptor, MasterApi, ReplicaRequest, ReplicaResponse, ReplicaSetExecutor, Result,
    YadfsError,
};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct RetrieveFileOperation {
    master: Arc<dyn MasterApi>,
    executor: Arc<ReplicaSetExecutor>,
}

#[derive(Debug, Clone)]
pub struct RetrieveFileOperationResult {
    pub file: FileDescriptor,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub enum RetrieveFileOperationOutcome {
    Found(RetrieveFileOperationResult),
    NotFound,
}

impl RetrieveFileOperation {
    pub fn new(master: Arc<dyn MasterApi>, executor: Arc<ReplicaSetExecutor>) -> Self {
        Self { master, executor }
    }

    pub async fn run(&self, path: &str) -> Result<RetrieveFileOperationOutcome> {
        let Some(file) = self.master.resolve_file(path).await? else {
            tracing::debug!("Retrieve: no such file path={}", path);
            return Ok(RetrieveFileOperationOutcome::NotFound);
        };

        let fetched = self
            .executor
            .execute(&file.nodes, &file.file_id, ReplicaRequest::Fetch)
            .await
            .and_then(|response| match response {
                ReplicaResponse::Fetched { body, source } => {
                    tracing::debug!("Retrieved path={} from node={}", path, source);
                    Ok(body)
                }
                other => Err(YadfsError::Internal(format!(
                    "fetch returned {:?}",
                    other
                ))),
            });

        let body = match fetched {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(
                    "Retrieve failed after resolve: leg=fetch path={} file_id={} error={}",
                    path,
                    file.file_id,
                    error
                );
                return Err(error);
            }
        };

        Ok(RetrieveFileOperationOutcome::Found(
            RetrieveFileOperationResult { file, body },
        ))
    }
}
