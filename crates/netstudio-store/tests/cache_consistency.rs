//! Integration tests for query-cache consistency under interleaving.
//!
//! `GatedStore` wraps the real file store and can pause one read after it
//! has loaded its data from disk, so a mutation can run to completion while
//! the read is still in flight.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use netstudio_core::{
    DatasetFormat, DatasetPurpose, ModelType, NetId, NetIndex, NetworkConfig, TrainedParams,
    DEFAULT_NET_NAME,
};
use netstudio_store::application::manage_nets::NetService;
use netstudio_store::application::store::{NetStore, StoreError};
use netstudio_store::infrastructure::storage::fs_store::FsNetStore;
use tokio::sync::oneshot;
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatePoint {
    Index,
    Config,
}

/// Signals "read done" to the test, then waits for the test to resume it.
struct Gate {
    point: GatePoint,
    loaded: oneshot::Sender<()>,
    resume: oneshot::Receiver<()>,
}

struct GatedStore {
    inner: FsNetStore,
    gate: Mutex<Option<Gate>>,
}

impl GatedStore {
    fn new(root: &Path) -> Self {
        Self {
            inner: FsNetStore::new(root),
            gate: Mutex::new(None),
        }
    }

    /// Pauses the next read at `point`.  Returns the "loaded" receiver and
    /// the "resume" sender.
    fn arm(&self, point: GatePoint) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (loaded_tx, loaded_rx) = oneshot::channel();
        let (resume_tx, resume_rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(Gate {
            point,
            loaded: loaded_tx,
            resume: resume_rx,
        });
        (loaded_rx, resume_tx)
    }

    async fn pass(&self, point: GatePoint) {
        let gate = {
            let mut slot = self.gate.lock().unwrap();
            match slot.as_ref() {
                Some(gate) if gate.point == point => slot.take(),
                _ => None,
            }
        };
        if let Some(gate) = gate {
            gate.loaded.send(()).ok();
            gate.resume.await.ok();
        }
    }
}

#[async_trait]
impl NetStore for GatedStore {
    async fn read_index(&self) -> Result<NetIndex, StoreError> {
        let index = self.inner.read_index().await?;
        self.pass(GatePoint::Index).await;
        Ok(index)
    }

    async fn write_index(&self, index: &NetIndex) -> Result<(), StoreError> {
        self.inner.write_index(index).await
    }

    async fn read_config(&self, id: NetId) -> Result<NetworkConfig, StoreError> {
        let config = self.inner.read_config(id).await?;
        self.pass(GatePoint::Config).await;
        Ok(config)
    }

    async fn write_config(&self, config: &NetworkConfig) -> Result<(), StoreError> {
        self.inner.write_config(config).await
    }

    async fn delete_config(&self, id: NetId) -> Result<(), StoreError> {
        self.inner.delete_config(id).await
    }

    async fn write_trained_params(&self, params: &TrainedParams) -> Result<(), StoreError> {
        self.inner.write_trained_params(params).await
    }

    async fn delete_trained_params(&self, id: NetId) -> Result<(), StoreError> {
        self.inner.delete_trained_params(id).await
    }

    async fn write_dataset(
        &self,
        bytes: &[u8],
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError> {
        self.inner.write_dataset(bytes, purpose, id, format).await
    }

    async fn read_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<Vec<u8>, StoreError> {
        self.inner.read_dataset(purpose, id, format).await
    }

    async fn delete_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<(), StoreError> {
        self.inner.delete_dataset(purpose, id, format).await
    }
}

/// A data root under the system temp dir, removed when dropped.
struct DataDir(PathBuf);

impl DataDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("netstudio_cache_{}", Uuid::new_v4())))
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_record_read_overlapping_rename_is_not_cached() {
    // Arrange
    let dir = DataDir::new();
    let service = Arc::new(NetService::new(GatedStore::new(&dir.0)));
    let id = service
        .create_net(ModelType::MultilayerPerceptron)
        .await
        .unwrap()
        .id;
    let (loaded, resume) = service.store().arm(GatePoint::Config);

    // Act: the reader loads the old record, then the rename completes.
    let reader = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.get_net(id).await }
    });
    loaded.await.unwrap();
    service.rename_net(id, "Foo").await.unwrap();
    resume.send(()).unwrap();
    let overlapped = reader.await.unwrap().unwrap();

    // Assert: the in-flight read may see the old name, later reads may not.
    assert_eq!(overlapped.name, DEFAULT_NET_NAME);
    assert_eq!(service.get_net(id).await.unwrap().name, "Foo");
}

#[tokio::test]
async fn test_list_read_overlapping_create_is_not_cached() {
    // Arrange
    let dir = DataDir::new();
    let service = Arc::new(NetService::new(GatedStore::new(&dir.0)));
    let (loaded, resume) = service.store().arm(GatePoint::Index);

    // Act: the reader loads the empty index, then a network is created.
    let reader = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.list_nets().await }
    });
    loaded.await.unwrap();
    let created = service
        .create_net(ModelType::MultilayerPerceptron)
        .await
        .unwrap();
    resume.send(()).unwrap();
    let overlapped = reader.await.unwrap().unwrap();

    // Assert
    assert!(overlapped.is_empty());
    assert_eq!(service.list_nets().await.unwrap(), vec![created.summary()]);
}

#[tokio::test]
async fn test_record_read_after_rename_sees_new_name_without_interleaving() {
    let dir = DataDir::new();
    let service = NetService::new(GatedStore::new(&dir.0));
    let id = service
        .create_net(ModelType::MultilayerPerceptron)
        .await
        .unwrap()
        .id;
    service.get_net(id).await.unwrap();

    service.rename_net(id, "Bar").await.unwrap();

    assert_eq!(service.get_net(id).await.unwrap().name, "Bar");
}
