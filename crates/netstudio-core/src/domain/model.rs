//! Model types, hyperparameter settings and default templates.
//!
//! Every saved network carries a `modelType` tag.  The tag selects which
//! hyperparameter block the record contains and which default template a
//! freshly created network starts from.
//!
//! # JSON shape
//!
//! All enums serialise as camelCase strings and all struct fields as camelCase
//! keys, matching the files the desktop UI reads directly:
//!
//! ```json
//! {
//!   "modelType": "multilayerPerceptron",
//!   "hiddenLayersCnt": 2,
//!   "networkType": "regression",
//!   "hiddenLayersSettings": [{ "activationFunc": "relu", "neuronCnt": 16 }]
//! }
//! ```
//!
//! # Structural fields
//!
//! Some settings define the *shape* of the network (layer count and neuron
//! counts).  Once a network has been saved for the first time those fields
//! are locked; [`ModelSettings::same_structure`] is the comparison the save
//! path uses to enforce that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule violations detected before a record is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("network name must not be empty")]
    EmptyName,

    #[error("hiddenLayersCnt is {declared} but {actual} hidden layer settings were supplied")]
    HiddenLayerCountMismatch { declared: u32, actual: usize },

    #[error("{field} must be at least 1")]
    ZeroNeurons { field: String },

    #[error("iterationCnt must be at least 1")]
    ZeroIterations,

    #[error("classification network has {neurons} output neurons but {labels} labels")]
    OutputLabelMismatch { neurons: u32, labels: usize },

    #[error("output column {0} is also listed as an input column")]
    OutputColumnIncluded(u32),

    #[error("structural settings are locked after the first save")]
    StructureLocked,

    #[error("model type cannot change from {stored} to {requested}")]
    ModelTypeChanged {
        stored: ModelType,
        requested: ModelType,
    },

    #[error("unknown model type: {0:?}")]
    UnknownModelType(String),

    #[error("unknown dataset purpose {0:?} (expected training or testing)")]
    UnknownDatasetPurpose(String),
}

// ── Selector enums ────────────────────────────────────────────────────────────

/// Closed set of network architectures the application can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelType {
    MultilayerPerceptron,
}

impl ModelType {
    /// Every variant, in display order.
    pub const ALL: [ModelType; 1] = [ModelType::MultilayerPerceptron];

    /// The tag as it appears in JSON files.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::MultilayerPerceptron => "multilayerPerceptron",
        }
    }

    /// Returns the default hyperparameters a new network of this type starts
    /// with.
    ///
    /// The `match` is exhaustive: adding a variant to [`ModelType`] does not
    /// compile until it has a template.
    pub fn default_settings(self) -> ModelSettings {
        match self {
            ModelType::MultilayerPerceptron => {
                ModelSettings::MultilayerPerceptron(MlpSettings::default())
            }
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownModelType(s.to_string()))
    }
}

/// Whether the network predicts a class or a continuous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkType {
    Classification,
    Regression,
}

/// Normalisation applied to input columns before training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NormalizationFunc {
    Normalization,
    NoNormalization,
}

/// Activation function of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationFunc {
    Softmax,
    Relu,
    Linear,
    Sigmoid,
}

/// Cost function minimised during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostFunc {
    Mse,
}

// ── Settings blocks ───────────────────────────────────────────────────────────

/// Settings of one hidden layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenLayer {
    pub activation_func: ActivationFunc,
    pub neuron_cnt: u32,
}

/// Hyperparameters of a multilayer perceptron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlpSettings {
    pub hidden_layers_cnt: u32,
    pub network_type: NetworkType,

    pub input_normalization_func: NormalizationFunc,
    pub input_neuron_cnt: u32,

    pub hidden_layers_settings: Vec<HiddenLayer>,

    pub output_neuron_cnt: u32,
    pub output_activation_func: ActivationFunc,
    pub output_neuron_labels: Vec<String>,

    pub cost_func: CostFunc,
    pub iteration_cnt: u32,

    /// Index of the CSV column holding the expected output.
    pub output_col: u32,
    /// Indices of the CSV columns used as inputs.
    pub included_cols: Vec<u32>,
}

impl Default for MlpSettings {
    fn default() -> Self {
        let hidden = HiddenLayer {
            activation_func: ActivationFunc::Relu,
            neuron_cnt: 16,
        };
        Self {
            hidden_layers_cnt: 2,
            network_type: NetworkType::Regression,
            input_normalization_func: NormalizationFunc::Normalization,
            input_neuron_cnt: 1,
            hidden_layers_settings: vec![hidden.clone(), hidden],
            output_neuron_cnt: 1,
            output_activation_func: ActivationFunc::Sigmoid,
            output_neuron_labels: vec!["output".to_string()],
            cost_func: CostFunc::Mse,
            iteration_cnt: 10_000,
            output_col: 0,
            included_cols: Vec::new(),
        }
    }
}

impl MlpSettings {
    /// Checks internal consistency of the settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hidden_layers_settings.len() != self.hidden_layers_cnt as usize {
            return Err(ValidationError::HiddenLayerCountMismatch {
                declared: self.hidden_layers_cnt,
                actual: self.hidden_layers_settings.len(),
            });
        }
        if self.input_neuron_cnt == 0 {
            return Err(zero_neurons("inputNeuronCnt"));
        }
        if let Some(i) = self
            .hidden_layers_settings
            .iter()
            .position(|layer| layer.neuron_cnt == 0)
        {
            return Err(zero_neurons(&format!("hiddenLayersSettings[{i}].neuronCnt")));
        }
        if self.output_neuron_cnt == 0 {
            return Err(zero_neurons("outputNeuronCnt"));
        }
        if self.iteration_cnt == 0 {
            return Err(ValidationError::ZeroIterations);
        }
        if self.network_type == NetworkType::Classification
            && self.output_neuron_labels.len() != self.output_neuron_cnt as usize
        {
            return Err(ValidationError::OutputLabelMismatch {
                neurons: self.output_neuron_cnt,
                labels: self.output_neuron_labels.len(),
            });
        }
        if self.included_cols.contains(&self.output_col) {
            return Err(ValidationError::OutputColumnIncluded(self.output_col));
        }
        Ok(())
    }

    /// `true` when both settings describe the same network shape.
    ///
    /// Activation functions are not part of the shape; neuron counts are.
    pub fn same_structure(&self, other: &MlpSettings) -> bool {
        self.hidden_layers_cnt == other.hidden_layers_cnt
            && self.input_neuron_cnt == other.input_neuron_cnt
            && self.output_neuron_cnt == other.output_neuron_cnt
            && self
                .hidden_layers_settings
                .iter()
                .map(|l| l.neuron_cnt)
                .eq(other.hidden_layers_settings.iter().map(|l| l.neuron_cnt))
    }
}

fn zero_neurons(field: &str) -> ValidationError {
    ValidationError::ZeroNeurons {
        field: field.to_string(),
    }
}

/// Hyperparameters of a network, tagged by `modelType`.
///
/// Serialised inline (flattened) into the full network record, so the
/// `modelType` key and the hyperparameter keys sit next to `name` and `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "modelType", rename_all = "camelCase")]
pub enum ModelSettings {
    MultilayerPerceptron(MlpSettings),
}

impl ModelSettings {
    pub fn model_type(&self) -> ModelType {
        match self {
            ModelSettings::MultilayerPerceptron(_) => ModelType::MultilayerPerceptron,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ModelSettings::MultilayerPerceptron(mlp) => mlp.validate(),
        }
    }

    /// `true` when both settings have the same model type and shape.
    pub fn same_structure(&self, other: &ModelSettings) -> bool {
        match (self, other) {
            (ModelSettings::MultilayerPerceptron(a), ModelSettings::MultilayerPerceptron(b)) => {
                a.same_structure(b)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
