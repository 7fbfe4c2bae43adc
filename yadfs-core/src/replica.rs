//! Byte transfers against a replica set.
//!
//! Fetch walks the replica set in the order the master listed it and returns the
//! first body it gets back. Store writes to every replica and succeeds once the
//! write quorum has acknowledged.

use crate::http::{TransportOptions, build_http_client, response_message};
use crate::master::DatanodeAddress;
use crate::{Result, YadfsError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url, header};
use std::sync::Arc;
use std::time::Duration;

/// Single request against a single datanode.
#[async_trait]
pub trait DatanodeTransport: Send + Sync {
    async fn fetch(&self, node: &DatanodeAddress, file_id: &str) -> Result<Bytes>;

    async fn store(&self, node: &DatanodeAddress, file_id: &str, body: Bytes) -> Result<()>;
}

#[derive(Clone)]
pub struct HttpDatanodeTransport {
    client: Client,
}

impl HttpDatanodeTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        Ok(Self {
            client: build_http_client(options)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn file_url(&self, node: &DatanodeAddress, file_id: &str) -> Result<Url> {
        let mut url = node
            .base_url()?
            .join("file")
            .map_err(|error| YadfsError::Http(error.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("filename", file_id);
        }

        Ok(url)
    }
}

#[async_trait]
impl DatanodeTransport for HttpDatanodeTransport {
    async fn fetch(&self, node: &DatanodeAddress, file_id: &str) -> Result<Bytes> {
        let url = self.file_url(node, file_id)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(YadfsError::Http(format!(
                "datanode fetch failed: node={} status={} file_id={} {}",
                node,
                response.status(),
                file_id,
                response_message(response).await
            )));
        }

        Ok(response.bytes().await?)
    }

    async fn store(&self, node: &DatanodeAddress, file_id: &str, body: Bytes) -> Result<()> {
        let url = self.file_url(node, file_id)?;
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(YadfsError::Http(format!(
                "datanode store failed: node={} status={} file_id={} {}",
                node,
                response.status(),
                file_id,
                response_message(response).await
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReplicaPolicy {
    /// Upper bound on the acknowledgements a store waits for; capped by the replica count.
    pub min_write_replicas: usize,
    /// Attempts per datanode before it is considered failed. 1 disables retry.
    pub attempts_per_node: usize,
    pub retry_backoff: Duration,
}

impl Default for ReplicaPolicy {
    fn default() -> Self {
        Self {
            min_write_replicas: 3,
            attempts_per_node: 1,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl ReplicaPolicy {
    pub fn write_quorum(&self, replica_count: usize) -> usize {
        self.min_write_replicas.min(replica_count).max(1)
    }
}

#[derive(Debug, Clone)]
pub enum ReplicaRequest {
    Fetch,
    Store(Bytes),
}

#[derive(Debug, Clone)]
pub enum ReplicaResponse {
    Fetched { body: Bytes, source: DatanodeAddress },
    Stored(StoreReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReceipt {
    pub acknowledged: usize,
    pub required: usize,
    pub failed_nodes: Vec<DatanodeAddress>,
}

#[derive(Clone)]
pub struct ReplicaSetExecutor {
    transport: Arc<dyn DatanodeTransport>,
    policy: ReplicaPolicy,
}

impl ReplicaSetExecutor {
    pub fn new(transport: Arc<dyn DatanodeTransport>, policy: ReplicaPolicy) -> Self {
        Self { transport, policy }
    }

    pub async fn execute(
        &self,
        nodes: &[DatanodeAddress],
        file_id: &str,
        request: ReplicaRequest,
    ) -> Result<ReplicaResponse> {
        match request {
            ReplicaRequest::Fetch => {
                let (body, source) = self.fetch_with_source(nodes, file_id).await?;
                Ok(ReplicaResponse::Fetched { body, source })
            }
            ReplicaRequest::Store(body) => {
                let receipt = self.store(nodes, file_id, body).await?;
                Ok(ReplicaResponse::Stored(receipt))
            }
        }
    }

    async fn fetch_with_source(
        &self,
        nodes: &[DatanodeAddress],
        file_id: &str,
    ) -> Result<(Bytes, DatanodeAddress)> {
        if nodes.is_empty() {
            return Err(YadfsError::Replica {
                mode: "fetch",
                file_id: file_id.to_string(),
                message: "replica set is empty".to_string(),
            });
        }

        let mut last_error = None;
        for node in nodes {
            match self.fetch_from_node(node, file_id).await {
                Ok(body) => {
                    tracing::debug!(
                        "Fetched {} bytes: node={} file_id={}",
                        body.len(),
                        node,
                        file_id
                    );
                    return Ok((body, node.clone()));
                }
                Err(error) => {
                    tracing::warn!(
                        "Replica fetch failed: node={} file_id={} error={}",
                        node,
                        file_id,
                        error
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(YadfsError::Replica {
            mode: "fetch",
            file_id: file_id.to_string(),
            message: format!(
                "all {} replicas failed, last error: {}",
                nodes.len(),
                last_error
                    .map(|error| error.to_string())
                    .unwrap_or_default()
            ),
        })
    }

    async fn store(
        &self,
        nodes: &[DatanodeAddress],
        file_id: &str,
        body: Bytes,
    ) -> Result<StoreReceipt> {
        if nodes.is_empty() {
            return Err(YadfsError::Replica {
                mode: "store",
                file_id: file_id.to_string(),
                message: "replica set is empty".to_string(),
            });
        }

        let required = self.policy.write_quorum(nodes.len());
        let mut acknowledged = 0usize;
        let mut failed_nodes = Vec::new();

        for node in nodes {
            match self.store_to_node(node, file_id, body.clone()).await {
                Ok(()) => acknowledged += 1,
                Err(error) => {
                    tracing::warn!(
                        "Replica store failed: node={} file_id={} error={}",
                        node,
                        file_id,
                        error
                    );
                    failed_nodes.push(node.clone());
                }
            }
        }

        if acknowledged < required {
            return Err(YadfsError::InsufficientReplicas {
                file_id: file_id.to_string(),
                required,
                found: acknowledged,
            });
        }

        Ok(StoreReceipt {
            acknowledged,
            required,
            failed_nodes,
        })
    }

    async fn fetch_from_node(&self, node: &DatanodeAddress, file_id: &str) -> Result<Bytes> {
        let attempts = self.policy.attempts_per_node.max(1);
        let mut attempt = 1;
        loop {
            match self.transport.fetch(node, file_id).await {
                Ok(body) => return Ok(body),
                Err(error) if attempt >= attempts => return Err(error),
                Err(error) => {
                    tracing::debug!(
                        "Retrying fetch: node={} file_id={} attempt={} error={}",
                        node,
                        file_id,
                        attempt,
                        error
                    );
                    attempt += 1;
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
            }
        }
    }

    async fn store_to_node(&self, node: &DatanodeAddress, file_id: &str, body: Bytes) -> Result<()> {
        let attempts = self.policy.attempts_per_node.max(1);
        let mut attempt = 1;
        loop {
            match self.transport.store(node, file_id, body.clone()).await {
                Ok(()) => return Ok(()),
                Err(error) if attempt >= attempts => return Err(error),
                Err(error) => {
                    tracing::debug!(
                        "Retrying store: node={} file_id={} attempt={} error={}",
                        node,
                        file_id,
                        attempt,
                        error
                    );
                    attempt += 1;
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
            }
        }
    }
}
