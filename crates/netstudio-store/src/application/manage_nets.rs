//! ManageNets use cases: list, create, rename, save and delete networks.
//!
//! [`NetService`] is the single entry point the UI bridge and the CLI go
//! through.  Every mutation follows the same shape:
//!
//! ```text
//! lock mutations ──► read on-disk state ──► compute new state
//!      ──► write files (index last on create/rename, first on delete)
//!      ──► invalidate cached queries
//! ```
//!
//! # Write ordering
//!
//! The index is the commit point: readers discover ids only through it.
//!
//! - **create** writes the record and the trained-params placeholder first,
//!   then appends to the index.  A crash in between leaves an orphan file
//!   but never an index entry without a record.
//! - **rename** writes the record first, then the index.
//! - **delete** removes the index entry first, then the files.
//!
//! Each single file write is atomic (see `infrastructure::storage::atomic`);
//! there is no rollback across files.
//!
//! # Concurrency
//!
//! Mutations issued through one service are serialised by an async mutex so
//! their read-modify-write of the index cannot interleave.  Nothing protects
//! against a second process writing the same data directory.

use netstudio_core::{
    validate_name, DatasetFormat, DatasetPurpose, ModelType, NetId, NetUpdate, NetworkConfig,
    NetworkSummary, TrainedParams,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::{QueryCache, QueryKey};
use super::selection::Selection;
use super::store::{NetStore, StoreError};

/// Use-case facade over a [`NetStore`].
pub struct NetService<S: NetStore> {
    store: S,
    cache: QueryCache,
    selection: Selection,
    mutations: Mutex<()>,
    purge_artifacts_on_delete: bool,
}

impl<S: NetStore> NetService<S> {
    /// Creates a service with an empty cache and no selection.
    ///
    /// Deleting a network also removes its trained-params and dataset files
    /// unless disabled with [`NetService::with_artifact_cleanup`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
            selection: Selection::new(),
            mutations: Mutex::new(()),
            purge_artifacts_on_delete: true,
        }
    }

    /// Enables or disables removal of trained-params and dataset files on
    /// delete.
    pub fn with_artifact_cleanup(mut self, enabled: bool) -> Self {
        self.purge_artifacts_on_delete = enabled;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Returns every network summary in insertion order (`netList` query).
    pub async fn list_nets(&self) -> Result<Vec<NetworkSummary>, StoreError> {
        if let Some(list) = self.cache.net_list().await {
            debug!("netList served from cache");
            return Ok(list);
        }
        let generation = self.cache.generation().await;
        let list = self.store.read_index().await?.into_entries();
        if !self.cache.store_net_list(list.clone(), generation).await {
            debug!("netList changed while reading, result not cached");
        }
        Ok(list)
    }

    /// Returns the full record of `id` (`net` query).
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the record file is missing.
    pub async fn get_net(&self, id: NetId) -> Result<NetworkConfig, StoreError> {
        if let Some(config) = self.cache.net(id).await {
            debug!(%id, "net served from cache");
            return Ok(config);
        }
        let generation = self.cache.generation().await;
        let config = self.store.read_config(id).await?;
        if !self.cache.store_net(config.clone(), generation).await {
            debug!(%id, "net changed while reading, result not cached");
        }
        Ok(config)
    }

    /// Returns the record of the selected network, or `None` when nothing
    /// is selected.
    pub async fn current_net(&self) -> Result<Option<NetworkConfig>, StoreError> {
        match self.selection.current() {
            Some(id) => self.get_net(id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Selects `id` as the current network.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if `id` is not in the index; the selection
    /// is left unchanged.
    pub async fn select_net(&self, id: NetId) -> Result<(), StoreError> {
        let known = self.list_nets().await?.iter().any(|net| net.id == id);
        if !known {
            return Err(StoreError::NotFound { id });
        }
        self.selection.select(id);
        Ok(())
    }

    /// Reads a stored dataset.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if `id` is not in the index or the dataset
    /// was never stored.
    pub async fn read_dataset(
        &self,
        purpose: DatasetPurpose,
        id: NetId,
        format: DatasetFormat,
    ) -> Result<Vec<u8>, StoreError> {
        self.ensure_indexed(id).await?;
        self.store.read_dataset(purpose, id, format).await
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Creates a network from the default template of `model_type`.
    pub async fn create_net(&self, model_type: ModelType) -> Result<NetworkConfig, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut index = self.store.read_index().await?;
        let id = index.allocate_id();
        let config = NetworkConfig::new(id, model_type);

        self.store.write_config(&config).await?;
        self.store.write_trained_params(&TrainedParams { id }).await?;
        index.push(config.summary())?;
        self.store.write_index(&index).await?;

        info!(%id, model_type = %model_type, "network created");
        self.cache.invalidate(QueryKey::NetList).await;
        Ok(config)
    }

    /// Renames a network in both the index and its record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `id` is not in the index.  Nothing is
    ///   written and no entry is created.
    /// - [`StoreError::Validation`] if `name` is blank.
    pub async fn rename_net(&self, id: NetId, name: &str) -> Result<NetworkSummary, StoreError> {
        validate_name(name)?;
        let _guard = self.mutations.lock().await;

        let mut index = self.store.read_index().await?;
        if !index.contains(id) {
            return Err(StoreError::NotFound { id });
        }

        let mut config = self.store.read_config(id).await?;
        config.name = name.to_string();
        self.store.write_config(&config).await?;

        // The record on disk carries the new name from here on, so the
        // cached queries are dropped whether or not the index write lands.
        let committed = match index.rename(id, name) {
            Ok(summary) => {
                let summary = summary.clone();
                self.store.write_index(&index).await.map(|()| summary)
            }
            Err(e) => Err(e.into()),
        };
        self.cache.invalidate(QueryKey::NetList).await;
        self.cache.invalidate(QueryKey::Net).await;

        let summary = committed?;
        info!(%id, name, "network renamed");
        Ok(summary)
    }

    /// Saves a full settings update, optionally attaching a training dataset.
    ///
    /// The stored `name` is kept, `trainingFileSaved` becomes `true` when a
    /// dataset is attached, and `initialSetting` is always cleared.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the network does not exist.
    /// - [`StoreError::Validation`] if the settings are invalid or change a
    ///   locked structural field.  Nothing is written in that case.
    pub async fn save_net(
        &self,
        update: NetUpdate,
        training_dataset: Option<&[u8]>,
    ) -> Result<NetworkConfig, StoreError> {
        let id = update.id;
        let _guard = self.mutations.lock().await;

        self.ensure_indexed(id).await?;
        let stored = self.store.read_config(id).await?;
        let saved = stored.apply_update(update, training_dataset.is_some())?;

        if let Some(bytes) = training_dataset {
            self.store
                .write_dataset(bytes, DatasetPurpose::Training, id, DatasetFormat::Csv)
                .await?;
            debug!(%id, bytes = bytes.len(), "training dataset stored");
        }
        self.store.write_config(&saved).await?;

        info!(%id, training_file_saved = saved.training_file_saved, "network saved");
        self.cache.invalidate(QueryKey::Net).await;
        Ok(saved)
    }

    /// Stores a dataset for `id` without changing any other setting.
    ///
    /// Storing a training dataset also marks `trainingFileSaved`; storing a
    /// testing dataset leaves the record untouched.
    pub async fn save_dataset(
        &self,
        id: NetId,
        purpose: DatasetPurpose,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let _guard = self.mutations.lock().await;

        self.ensure_indexed(id).await?;
        let mut config = self.store.read_config(id).await?;
        self.store
            .write_dataset(bytes, purpose, id, DatasetFormat::Csv)
            .await?;

        if purpose == DatasetPurpose::Training && !config.training_file_saved {
            config.training_file_saved = true;
            self.store.write_config(&config).await?;
            self.cache.invalidate(QueryKey::Net).await;
        }
        info!(%id, %purpose, bytes = bytes.len(), "dataset stored");
        Ok(())
    }

    /// Deletes a network.
    ///
    /// The index entry is removed first, then the record.  Trained params
    /// and datasets are removed afterwards on a best-effort basis; failures
    /// there are logged and do not fail the delete.  Once the index is
    /// written the selection is reset and both queries are invalidated, even
    /// when removing the record then fails.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if `id` is not in the index.
    pub async fn delete_net(&self, id: NetId) -> Result<NetworkSummary, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut index = self.store.read_index().await?;
        let removed = index.remove(id)?;
        self.store.write_index(&index).await?;

        // The index commit has landed: the network is gone for every reader
        // even if removing its files fails below.
        self.selection.clear();
        let deleted = self.store.delete_config(id).await;
        self.cache.invalidate(QueryKey::NetList).await;
        self.cache.invalidate(QueryKey::Net).await;
        deleted?;

        if self.purge_artifacts_on_delete {
            self.purge_artifacts(id).await;
        }

        info!(%id, name = %removed.name, "network deleted");
        Ok(removed)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    async fn ensure_indexed(&self, id: NetId) -> Result<(), StoreError> {
        if self.store.read_index().await?.contains(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { id })
        }
    }

    async fn purge_artifacts(&self, id: NetId) {
        if let Err(e) = self.store.delete_trained_params(id).await {
            warn!(%id, error = %e, "failed to remove trained params of deleted network");
        }
        for purpose in DatasetPurpose::ALL {
            for format in DatasetFormat::ALL {
                if let Err(e) = self.store.delete_dataset(purpose, id, format).await {
                    warn!(%id, %purpose, error = %e, "failed to remove dataset of deleted network");
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
