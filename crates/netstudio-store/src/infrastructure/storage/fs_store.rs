//! File-system implementation of the [`NetStore`] port.
//!
//! JSON documents are written compactly (the UI never shows them raw) via
//! [`write_atomic`].  Reads distinguish three outcomes:
//!
//! - file present and valid  → the parsed record
//! - file absent             → `NotFound` (or an empty index for `nets.json`)
//! - file present, malformed → `Parse`, never auto-repaired

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use netstudio_core::{
    DatasetFormat, DatasetPurpose, NetId, NetIndex, NetworkConfig, TrainedParams,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use super::atomic::write_atomic;
use super::layout::DataLayout;
use crate::application::store::{NetStore, StoreError};

/// Stores every network file under one data root.
#[derive(Debug, Clone)]
pub struct FsNetStore {
    layout: DataLayout,
}

impl FsNetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: DataLayout::new(root),
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    async fn write_json<T: Serialize + Sync>(&self, path: PathBuf, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(StoreError::Serialize)?;
        write_bytes(path, &bytes).await
    }
}

/// Reads and parses a JSON file.  `Ok(None)` when the file does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match read_bytes(path).await? {
        Some(bytes) => bytes,
        None => return Ok(None),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn write_bytes(path: PathBuf, bytes: &[u8]) -> Result<(), StoreError> {
    write_atomic(&path, bytes)
        .await
        .map_err(|source| StoreError::Io { path: path.clone(), source })?;
    debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

/// Removes a file; a missing file counts as success.
async fn remove_if_exists(path: PathBuf) -> Result<(), StoreError> {
    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!(path = %path.display(), "file removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io { path, source }),
    }
}

#[async_trait]
impl NetStore for FsNetStore {
    async fn read_index(&self) -> Result<NetIndex, StoreError> {
        Ok(read_json(&self.layout.index_path()).await?.unwrap_or_default())
    }

    async fn write_index(&self, index: &NetIndex) -> Result<(), StoreError> {
        self.write_json(self.layout.index_path(), index).await
    }

    async fn read_config(&self, id: NetId) -> Result<NetworkConfig, StoreError> {
        read_json(&self.layout.config_path(id))
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn write_config(&self, config: &NetworkConfig) -> Result<(), StoreError> {
        self.write_json(self.layout.config_path(config.id), config)
            .await
    }

    async fn delete_config(&self, id: NetId) -> Result<(), StoreError> {
        remove_if_exists(self.layout.config_path(id)).await
    }

    async fn write_trained_params(&self, params: &TrainedParams) -> Result<(), StoreError> {
        self.write_json(self.layout.trained_params_path(params.id), params)
            .await
    }

    async fn delete_trained_params(&self, id: NetId) -> Result<(), StoreError> {
        remove_if_exists(self.layout.trained_params_path(id)).await
    }

    async fn write_dataset(
        &self,
        bytes: &[u8],
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError> {
        write_bytes(self.layout.dataset_path(purpose, id, format), bytes).await
    }

    async fn read_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<Vec<u8>, StoreError> {
        read_bytes(&self.layout.dataset_path(purpose, id, format))
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn delete_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError> {
        remove_if_exists(self.layout.dataset_path(purpose, id, format)).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
