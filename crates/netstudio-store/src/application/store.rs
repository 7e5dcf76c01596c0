//! The storage port used by the use cases.
//!
//! [`NetStore`] is the narrow set of reads and writes the application needs
//! from persistent storage.  The file-system implementation lives in
//! `infrastructure::storage::fs_store`; unit tests use the `mockall`-generated
//! `MockNetStore` to inject failures at exact points.
//!
//! Every method is a suspension point.  Nothing here locks across calls:
//! callers that read, modify and write the index must serialise themselves.

use std::path::PathBuf;

use async_trait::async_trait;
use netstudio_core::{
    DatasetFormat, DatasetPurpose, IndexError, NetId, NetIndex, NetworkConfig, TrainedParams,
    ValidationError,
};
use thiserror::Error;

/// Errors surfaced by the store and the use cases built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id is not in the index, or its file is missing.
    #[error("network {id} not found")]
    NotFound { id: NetId },

    /// A file-system read, write, rename or delete failed.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored JSON document could not be parsed.
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded as JSON.
    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The index already holds `id`; another writer changed it underneath us.
    #[error("network {id} is already in the index")]
    Conflict { id: NetId },

    /// The requested change breaks a domain rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<IndexError> for StoreError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::UnknownId(id) => StoreError::NotFound { id },
            IndexError::DuplicateId(id) => StoreError::Conflict { id },
        }
    }
}

/// Persistent storage for network records and datasets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetStore: Send + Sync {
    /// Reads the index.  A missing index file yields an empty index.
    async fn read_index(&self) -> Result<NetIndex, StoreError>;

    /// Overwrites the index.
    async fn write_index(&self, index: &NetIndex) -> Result<(), StoreError>;

    /// Reads the full record of `id`.
    ///
    /// Returns [`StoreError::NotFound`] if its file does not exist.
    async fn read_config(&self, id: NetId) -> Result<NetworkConfig, StoreError>;

    /// Writes the full record; the location is derived from `config.id`.
    async fn write_config(&self, config: &NetworkConfig) -> Result<(), StoreError>;

    /// Deletes the full record of `id`.  A missing file is not an error.
    async fn delete_config(&self, id: NetId) -> Result<(), StoreError>;

    async fn write_trained_params(&self, params: &TrainedParams) -> Result<(), StoreError>;

    /// Deletes the trained-params file of `id`.  A missing file is not an error.
    async fn delete_trained_params(&self, id: NetId) -> Result<(), StoreError>;

    async fn write_dataset(
        &self,
        bytes: &[u8],
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError>;

    /// Reads a dataset.  Returns [`StoreError::NotFound`] if it was never stored.
    async fn read_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<Vec<u8>, StoreError>;

    /// Deletes a dataset.  A missing file is not an error.
    async fn delete_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError>;
}
