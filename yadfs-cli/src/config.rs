use serde::{Deserialize, Serialize};
use std::time::Duration;
use yadfs_core::{ReplicaPolicy, Result, TransportOptions, YadfsError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub master: MasterConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub replication: ReplicationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    #[serde(default = "default_master_address")]
    pub address: String,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            address: default_master_address(),
        }
    }
}

fn default_master_address() -> String {
    "http://localhost:3030/".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_system_proxy")]
    pub system_proxy: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            system_proxy: default_system_proxy(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_system_proxy() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationConfig {
    #[serde(default = "default_min_write_replicas")]
    pub min_write_replicas: usize,
    #[serde(default = "default_attempts_per_node")]
    pub attempts_per_node: usize,
    #[serde(default = "default_retry_backoff_millis")]
    pub retry_backoff_millis: u64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            min_write_replicas: default_min_write_replicas(),
            attempts_per_node: default_attempts_per_node(),
            retry_backoff_millis: default_retry_backoff_millis(),
        }
    }
}

fn default_min_write_replicas() -> usize {
    3
}

fn default_attempts_per_node() -> usize {
    1
}

fn default_retry_backoff_millis() -> u64 {
    200
}

impl Config {
    /// Layers an optional config file under `YADFS_*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("YADFS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| YadfsError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| YadfsError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.master.address.trim().is_empty() {
            return Err(YadfsError::Config(
                "master.address cannot be empty".to_string(),
            ));
        }

        if self.replication.min_write_replicas == 0 {
            return Err(YadfsError::Config(
                "replication.min_write_replicas must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            request_timeout: Duration::from_secs(self.transport.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.transport.connect_timeout_secs),
            system_proxy: self.transport.system_proxy,
        }
    }

    pub fn replica_policy(&self) -> ReplicaPolicy {
        ReplicaPolicy {
            min_write_replicas: self.replication.min_write_replicas,
            attempts_per_node: self.replication.attempts_per_node,
            retry_backoff: Duration::from_millis(self.replication.retry_backoff_millis),
        }
    }
}
