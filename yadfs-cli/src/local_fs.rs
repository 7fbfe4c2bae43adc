use bytes::Bytes;
use std::path::Path;
use yadfs_core::{Result, YadfsError};

pub async fn read_local(path: &str) -> Result<Bytes> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| YadfsError::local_io(path, e))?;
    Ok(Bytes::from(data))
}

/// Creates or truncates `path`.
pub async fn write_local(path: &str, body: &[u8]) -> Result<()> {
    tokio::fs::write(path, body)
        .await
        .map_err(|e| YadfsError::local_io(path, e))
}

/// Final component of a local path, used as the remote file name on upload.
pub fn basename(path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            YadfsError::invalid_arguments("upload", format!("'{}' does not name a file", path))
        })
}
