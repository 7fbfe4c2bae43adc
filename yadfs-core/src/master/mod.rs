//! Metadata operations against the master.
//!
//! [`MasterApi`] is the seam the operations are written against; [`MasterClient`]
//! is the HTTP implementation used by the shell.

pub mod client;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;

pub use client::MasterClient;
pub use types::{AllocatedFile, DatanodeAddress, DirectoryListing, FileDescriptor, PathKind};

/// One request per call, no retries. Paths are already absolute.
#[async_trait]
pub trait MasterApi: Send + Sync {
    /// Free-form health payload of the master
    async fn status(&self) -> Result<serde_json::Value>;

    /// Look up an existing file; `None` when the master does not know it
    async fn resolve_file(&self, path: &str) -> Result<Option<FileDescriptor>>;

    /// Look up an existing directory; `None` when the master does not know it
    async fn resolve_directory(&self, path: &str) -> Result<Option<DirectoryListing>>;

    /// Register a new or overwritten file and obtain its replica set
    async fn allocate_file(&self, path: &str) -> Result<AllocatedFile>;

    async fn create_directory(&self, path: &str) -> Result<()>;

    async fn delete_path(&self, path: &str, kind: PathKind) -> Result<()>;
}
