use super::MasterApi;
use super::types::{AllocatedFile, DirectoryListing, FileDescriptor, PathKind, ResolveFileResponse};
use crate::http::{TransportOptions, build_http_client, response_message};
use crate::{Result, YadfsError};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct MasterClient {
    client: Client,
    base_url: Url,
}

impl MasterClient {
    pub fn new(address: &str, options: &TransportOptions) -> Result<Self> {
        Ok(Self {
            client: build_http_client(options)?,
            base_url: parse_base_url(address)?,
        })
    }

    pub fn with_client(client: Client, address: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(address)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn file_url(&self, path: &str) -> Result<Url> {
        self.endpoint_url("file", "filename", path)
    }

    pub fn directory_url(&self, path: &str) -> Result<Url> {
        self.endpoint_url("directory", "name", path)
    }

    fn endpoint_url(&self, endpoint: &str, key: &str, path: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|error| YadfsError::Http(error.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(key, path);
        }

        Ok(url)
    }

    fn path_url(&self, kind: PathKind, path: &str) -> Result<Url> {
        match kind {
            PathKind::File => self.file_url(path),
            PathKind::Directory => self.directory_url(path),
        }
    }

    async fn send(&self, method: Method, url: Url) -> Result<reqwest::Response> {
        tracing::debug!("master request: {} {}", method, url);
        let response = self.client.request(method, url).send().await?;
        Ok(response)
    }

    /// Decodes a 2xx body, maps 404 to `None` and everything else to a master failure.
    async fn decode_optional<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.decode(operation, path, response).await.map(Some)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = self.ensure_success(operation, path, response).await?;
        let bytes = response.bytes().await?;
        let payload = serde_json::from_slice(&bytes)?;
        Ok(payload)
    }

    async fn ensure_success(
        &self,
        operation: &'static str,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(YadfsError::Master {
            operation,
            path: path.to_string(),
            status: status.as_u16(),
            message: response_message(response).await,
        })
    }
}

#[async_trait]
impl MasterApi for MasterClient {
    async fn status(&self) -> Result<serde_json::Value> {
        let url = self
            .base_url
            .join("status")
            .map_err(|error| YadfsError::Http(error.to_string()))?;
        let response = self.send(Method::GET, url).await?;
        self.decode("status", "/", response).await
    }

    async fn resolve_file(&self, path: &str) -> Result<Option<FileDescriptor>> {
        let response = self.send(Method::GET, self.file_url(path)?).await?;
        let payload: Option<ResolveFileResponse> =
            self.decode_optional("resolve file", path, response).await?;

        Ok(payload.map(|payload| {
            let mut file = payload.file;
            if file.path.is_empty() {
                file.path = path.to_string();
            }
            file
        }))
    }

    async fn resolve_directory(&self, path: &str) -> Result<Option<DirectoryListing>> {
        let response = self.send(Method::GET, self.directory_url(path)?).await?;
        self.decode_optional("resolve directory", path, response)
            .await
    }

    async fn allocate_file(&self, path: &str) -> Result<AllocatedFile> {
        let response = self.send(Method::POST, self.file_url(path)?).await?;
        let mut allocated: AllocatedFile = self.decode("allocate file", path, response).await?;
        if allocated.file.path.is_empty() {
            allocated.file.path = path.to_string();
        }
        Ok(allocated)
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        let response = self.send(Method::POST, self.directory_url(path)?).await?;
        self.ensure_success("create directory", path, response)
            .await?;
        Ok(())
    }

    async fn delete_path(&self, path: &str, kind: PathKind) -> Result<()> {
        let response = self.send(Method::DELETE, self.path_url(kind, path)?).await?;
        let operation = match kind {
            PathKind::File => "delete file",
            PathKind::Directory => "delete directory",
        };
        self.ensure_success(operation, path, response).await?;
        Ok(())
    }
}

fn parse_base_url(address: &str) -> Result<Url> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(YadfsError::Config("master address cannot be empty".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|error| {
        YadfsError::Config(format!("invalid master address '{}': {}", address, error))
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
