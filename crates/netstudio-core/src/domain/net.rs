//! Persisted network records.
//!
//! Three record kinds live on disk for every network:
//!
//! | Record            | Stored in                        | Purpose                          |
//! |-------------------|----------------------------------|----------------------------------|
//! | `NetworkSummary`  | the shared index (`nets.json`)   | list entry shown in the sidebar  |
//! | `NetworkConfig`   | `nets/net_<id>.json`             | full settings document           |
//! | `TrainedParams`   | `trained_params/net_<id>.json`   | placeholder for training results |
//!
//! `NetworkConfig` is a superset of `NetworkSummary`: both carry `name`, `id`
//! and `modelType`, and the store keeps the two copies of `name` in sync.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{ModelSettings, ModelType, ValidationError};

/// Unique identifier of a saved network.
pub type NetId = Uuid;

/// Name given to every freshly created network.
pub const DEFAULT_NET_NAME: &str = "Unnamed network";

/// Index entry for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub name: String,
    pub id: NetId,
    pub model_type: ModelType,
}

/// The full settings document of one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub id: NetId,
    /// `true` until the first save.  While set, structural settings may
    /// still change.
    pub initial_setting: bool,
    /// Whether a training dataset has been stored for this network.
    #[serde(default)]
    pub training_file_saved: bool,
    #[serde(flatten)]
    pub settings: ModelSettings,
}

impl NetworkConfig {
    /// Builds a brand-new record from the default template of `model_type`.
    pub fn new(id: NetId, model_type: ModelType) -> Self {
        Self {
            name: DEFAULT_NET_NAME.to_string(),
            id,
            initial_setting: true,
            training_file_saved: false,
            settings: model_type.default_settings(),
        }
    }

    pub fn model_type(&self) -> ModelType {
        self.settings.model_type()
    }

    /// The index entry matching this record.
    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            name: self.name.clone(),
            id: self.id,
            model_type: self.model_type(),
        }
    }

    /// Produces the record that results from saving `update` over `self`.
    ///
    /// - `name` is kept from the stored record.
    /// - `trainingFileSaved` becomes `true` when `dataset_attached`, otherwise
    ///   it keeps its previous value.
    /// - `initialSetting` is always cleared.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ModelTypeChanged`] if the update carries another
    ///   model type.
    /// - [`ValidationError::StructureLocked`] if the stored record was already
    ///   saved once and the update changes its shape.
    /// - Any rule violation reported by [`ModelSettings::validate`].
    pub fn apply_update(
        &self,
        update: NetUpdate,
        dataset_attached: bool,
    ) -> Result<NetworkConfig, ValidationError> {
        let stored = self.model_type();
        let requested = update.settings.model_type();
        if stored != requested {
            return Err(ValidationError::ModelTypeChanged { stored, requested });
        }
        if !self.initial_setting && !self.settings.same_structure(&update.settings) {
            return Err(ValidationError::StructureLocked);
        }
        update.settings.validate()?;

        Ok(NetworkConfig {
            name: self.name.clone(),
            id: self.id,
            initial_setting: false,
            training_file_saved: self.training_file_saved || dataset_attached,
            settings: update.settings,
        })
    }
}

/// Payload of a full save.
///
/// Omits the fields a caller cannot set directly: `name` (changed only by
/// rename), `initialSetting` and `trainingFileSaved` (derived by the save).
/// Those keys are ignored if a client sends them anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetUpdate {
    pub id: NetId,
    #[serde(flatten)]
    pub settings: ModelSettings,
}

impl From<&NetworkConfig> for NetUpdate {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            id: config.id,
            settings: config.settings.clone(),
        }
    }
}

/// Placeholder for training results, written empty when a network is
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainedParams {
    pub id: NetId,
}

/// Checks a user-supplied network name.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for empty or whitespace-only names.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
