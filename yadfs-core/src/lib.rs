//! YADFS Core - client-side orchestration for a master/datanode file store

pub mod confirm;
pub mod error;
pub mod http;
pub mod master;
pub mod operations;
pub mod orchestrator;
pub mod replica;
pub mod session;

pub use confirm::{ConfirmationAnswer, Confirmer, confirm, parse_confirmation};
pub use error::{FailureKind, Result, YadfsError};
pub use http::{TransportOptions, build_http_client};
pub use master::{
    AllocatedFile, DatanodeAddress, DirectoryListing, FileDescriptor, MasterApi, MasterClient,
    PathKind,
};
pub use operations::*;
pub use orchestrator::Orchestrator;
pub use replica::{
    DatanodeTransport, HttpDatanodeTransport, ReplicaPolicy, ReplicaRequest, ReplicaResponse,
    ReplicaSetExecutor, StoreReceipt,
};
pub use session::{SessionContext, is_ancestor_or_self, join_path, normalize_path};
