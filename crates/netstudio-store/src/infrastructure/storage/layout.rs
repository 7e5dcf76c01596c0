//! On-disk layout of the data root.
//!
//! ```text
//! <root>/
//!   nets.json                        index (JSON array of summaries)
//!   nets/net_<id>.json               full record per network
//!   trained_params/net_<id>.json     training-results placeholder
//!   datasets/<purpose>_<id>.csv      raw dataset bytes
//! ```
//!
//! Every path is a pure function of the root and the id, so no lookup is
//! needed to find a file.

use std::path::{Path, PathBuf};

use netstudio_core::{dataset_file_name, DatasetFormat, DatasetPurpose, NetId};

pub const INDEX_FILE: &str = "nets.json";
pub const NETS_DIR: &str = "nets";
pub const TRAINED_PARAMS_DIR: &str = "trained_params";
pub const DATASETS_DIR: &str = "datasets";

/// Path builder rooted at the application-data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn config_path(&self, id: NetId) -> PathBuf {
        self.root.join(NETS_DIR).join(net_file_name(id))
    }

    pub fn trained_params_path(&self, id: NetId) -> PathBuf {
        self.root.join(TRAINED_PARAMS_DIR).join(net_file_name(id))
    }

    pub fn dataset_path(&self, purpose: DatasetPurpose, id: NetId, format: DatasetFormat) -> PathBuf {
        self.root
            .join(DATASETS_DIR)
            .join(dataset_file_name(purpose, id, format))
    }
}

fn net_file_name(id: NetId) -> String {
    format!("net_{id}.json")
}
