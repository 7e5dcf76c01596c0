//! # netstudio-core
//!
//! Shared domain library for Net Studio: the records that describe a saved
//! neural-network project, the default template for every model type, the
//! validation rules applied before a record is saved, and the ordered index
//! of known networks.
//!
//! This crate performs no I/O.  It has no knowledge of where records live on
//! disk or how the UI caches them; that is the job of `netstudio-store`.
//!
//! # Module overview
//!
//! - **`domain::model`** – Model-type tags, hyperparameter settings, the
//!   exhaustive default-template table, and validation.
//!
//! - **`domain::net`** – The persisted records: `NetworkSummary` (index
//!   entry), `NetworkConfig` (full record), `NetUpdate` (save payload) and the
//!   `TrainedParams` placeholder.
//!
//! - **`domain::index`** – `NetIndex`, the insertion-ordered list of
//!   summaries with id allocation and lookup.
//!
//! - **`domain::dataset`** – Dataset purposes, formats and file naming.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `netstudio_core::NetworkConfig` instead of the full module path.
pub use domain::dataset::{dataset_file_name, DatasetFormat, DatasetPurpose};
pub use domain::index::{IndexError, NetIndex};
pub use domain::model::{
    ActivationFunc, CostFunc, HiddenLayer, MlpSettings, ModelSettings, ModelType, NetworkType,
    NormalizationFunc, ValidationError,
};
pub use domain::net::{
    validate_name, NetId, NetUpdate, NetworkConfig, NetworkSummary, TrainedParams, DEFAULT_NET_NAME,
};
