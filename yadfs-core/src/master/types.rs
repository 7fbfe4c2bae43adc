use crate::{Result, YadfsError};
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatanodeAddress(String);

impl DatanodeAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL of the datanode. Bare `host:port` entries are reached over plain http.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.0.trim();
        let mut url = if raw.starts_with("http://") || raw.starts_with("https://") {
            Url::parse(raw)
        } else {
            Url::parse(&format!("http://{}", raw))
        }
        .map_err(|error| {
            YadfsError::Http(format!("invalid datanode address '{}': {}", self.0, error))
        })?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

impl fmt::Display for DatanodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    #[serde(deserialize_with = "deserialize_file_id")]
    pub file_id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub nodes: Vec<DatanodeAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedFile {
    pub file: FileDescriptor,
    #[serde(default)]
    pub datanodes: Vec<DatanodeAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub dirs: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveFileResponse {
    pub file: FileDescriptor,
}

fn deserialize_file_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFileId {
        Text(String),
        Number(u64),
    }

    Ok(match RawFileId::deserialize(deserializer)? {
        RawFileId::Text(text) => text,
        RawFileId::Number(number) => number.to_string(),
    })
}
