use crate::http::{TransportOptions, build_http_client};
use crate::{
    ChangeDirOperation, CopyFileOperation, DeletePathOperation, HttpDatanodeTransport,
    ListPathOperation, MakeDirOperation, MasterApi, MasterClient, ReplicaPolicy,
    ReplicaSetExecutor, Result, RetrieveFileOperation, StatusOperation, StoreFileOperation,
};
use std::sync::Arc;

/// Every operation the shell can run, wired against one master and one executor.
#[derive(Clone)]
pub struct Orchestrator {
    pub status: StatusOperation,
    pub store_file: StoreFileOperation,
    pub retrieve_file: RetrieveFileOperation,
    pub copy_file: CopyFileOperation,
    pub delete_path: DeletePathOperation,
    pub change_dir: ChangeDirOperation,
    pub make_dir: MakeDirOperation,
    pub list_path: ListPathOperation,
}

impl Orchestrator {
    pub fn new(master: Arc<dyn MasterApi>, executor: Arc<ReplicaSetExecutor>) -> Self {
        let store_file = StoreFileOperation::new(master.clone(), executor.clone());
        let retrieve_file = RetrieveFileOperation::new(master.clone(), executor);

        Self {
            status: StatusOperation::new(master.clone()),
            copy_file: CopyFileOperation::new(retrieve_file.clone(), store_file.clone()),
            store_file,
            retrieve_file,
            delete_path: DeletePathOperation::new(master.clone()),
            change_dir: ChangeDirOperation::new(master.clone()),
            make_dir: MakeDirOperation::new(master.clone()),
            list_path: ListPathOperation::new(master),
        }
    }

    /// HTTP master and datanodes sharing one connection pool.
    pub fn connect(
        master_address: &str,
        transport: &TransportOptions,
        policy: ReplicaPolicy,
    ) -> Result<Self> {
        let client = build_http_client(transport)?;
        let master = Arc::new(MasterClient::with_client(client.clone(), master_address)?);
        let datanodes = Arc::new(HttpDatanodeTransport::with_client(client));
        let executor = Arc::new(ReplicaSetExecutor::new(datanodes, policy));

        tracing::debug!("Connected orchestrator to master {}", master.base_url());
        Ok(Self::new(master, executor))
    }
}
