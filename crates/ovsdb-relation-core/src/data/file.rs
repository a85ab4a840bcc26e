// # File Relation Data
//
// Reads relation data from a JSON snapshot on disk.
//
// ## File Format
//
// ```json
// {
//   "private-address": "10.0.0.20",
//   "remote": {
//     "host": "10.0.0.10",
//     "port": 6640,
//     "protocol": "ssl"
//   }
// }
// ```
//
// `remote` holds the settings of the remote unit that triggered the hook.
// `port` may be a string or a number. Missing keys and empty strings are
// absent values.
//
// The snapshot is read lazily on every lookup, so a handler that never
// looks at relation data never touches the file.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::non_empty;
use crate::traits::RelationData;
use crate::Error;

/// Relation data backed by a JSON snapshot file
#[derive(Debug, Clone)]
pub struct FileRelationData {
    path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct RelationSnapshot {
    #[serde(rename = "private-address", alias = "private_address", default)]
    private_address: Option<String>,

    #[serde(default)]
    remote: RemoteSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteSettings {
    #[serde(default, deserialize_with = "scalar_as_string")]
    host: Option<String>,

    #[serde(default, deserialize_with = "scalar_as_string")]
    port: Option<String>,

    #[serde(default, deserialize_with = "scalar_as_string")]
    protocol: Option<String>,
}

/// Accept a JSON string, number or null
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

impl FileRelationData {
    /// Create a reader for the snapshot at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RelationSnapshot, Error> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::relation_data(format!(
                "Failed to read relation data {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::relation_data(format!(
                "Failed to parse relation data {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl RelationData for FileRelationData {
    async fn host(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.load().await?.remote.host))
    }

    async fn port(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.load().await?.remote.port))
    }

    async fn protocol(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.load().await?.remote.protocol))
    }

    async fn private_address(&self) -> Result<String, Error> {
        non_empty(self.load().await?.private_address).ok_or_else(|| {
            Error::relation_data(format!(
                "No private-address in relation data {}",
                self.path.display()
            ))
        })
    }
}
