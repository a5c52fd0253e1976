//! Scoring model artifacts: a fitted scaler plus a one-class classifier, keyed
//! by an ordered feature schema.
//!
//! The pipeline only sees [`ScoringModel`]. The artifact on disk is a JSON
//! manifest naming the features, the scaler parameters and the classifier
//! backend (an ONNX graph or the built-in z-score rule).

mod onnx;
mod scaler;
mod zscore;

pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;
pub use zscore::ZScoreClassifier;

use crate::error::{ModelError, ScoringError};
use crate::features::Feature;
use crate::ingest::LogSchema;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Label a classifier emits for an inlier.
pub const LABEL_NORMAL: i64 = 1;
/// Label a classifier emits for an outlier.
pub const LABEL_ANOMALOUS: i64 = -1;

/// Capability every scoring backend provides. Rows of the matrices follow
/// [`ScoringModel::feature_names`] column order.
pub trait ScoringModel: Send + Sync {
    /// Ordered feature schema the model was fit against.
    fn feature_names(&self) -> &[Feature];

    /// Apply the fitted scaling transform.
    fn transform(&self, features: Array2<f32>) -> Array2<f32>;

    /// One label per row: [`LABEL_NORMAL`] or [`LABEL_ANOMALOUS`].
    fn predict(&self, scaled: &Array2<f32>) -> Result<Vec<i64>, ScoringError>;
}

/// Classifier half of a fitted model.
pub trait Classifier: Send + Sync {
    fn predict(&self, scaled: &Array2<f32>) -> Result<Vec<i64>, ScoringError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub feature_names: Vec<String>,
    pub scaler: ScalerParams,
    pub classifier: ClassifierSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    Onnx {
        /// Relative paths resolve against the manifest's directory
        path: PathBuf,
        #[serde(default = "default_label_output")]
        label_output: String,
    },
    Zscore {
        threshold: f32,
    },
}

fn default_label_output() -> String {
    "label".to_string()
}

/// Scaler + classifier loaded from one manifest.
pub struct FittedModel {
    name: String,
    version: Option<String>,
    features: Vec<Feature>,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
}

impl FittedModel {
    pub fn new(
        name: impl Into<String>,
        features: Vec<Feature>,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        if scaler.width() != features.len() {
            return Err(ModelError::ScalerShape {
                field: "mean",
                expected: features.len(),
                got: scaler.width(),
            });
        }
        Ok(Self {
            name: name.into(),
            version: None,
            features,
            scaler,
            classifier,
        })
    }

    /// Load and validate the manifest at `path` for logs written in `schema`.
    /// Any failure here is fatal: scoring without a usable model is meaningless.
    pub fn load(path: &Path, schema: LogSchema) -> Result<Self, ModelError> {
        let data = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: ModelManifest =
            serde_json::from_str(&data).map_err(|source| ModelError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest(manifest, base_dir, schema)
    }

    pub fn from_manifest(
        manifest: ModelManifest,
        base_dir: &Path,
        schema: LogSchema,
    ) -> Result<Self, ModelError> {
        let features = resolve_features(&manifest.feature_names, schema)?;
        let scaler = StandardScaler::from_params(&manifest.scaler, features.len())?;

        let classifier: Box<dyn Classifier> = match &manifest.classifier {
            ClassifierSpec::Onnx { path, label_output } => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    base_dir.join(path)
                };
                Box::new(OnnxClassifier::load(&path, features.len(), label_output)?)
            }
            ClassifierSpec::Zscore { threshold } => Box::new(ZScoreClassifier::new(*threshold)?),
        };

        let mut model = Self::new(manifest.name, features, scaler, classifier)?;
        model.version = manifest.version;
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl ScoringModel for FittedModel {
    fn feature_names(&self) -> &[Feature] {
        &self.features
    }

    fn transform(&self, features: Array2<f32>) -> Array2<f32> {
        self.scaler.transform(features)
    }

    fn predict(&self, scaled: &Array2<f32>) -> Result<Vec<i64>, ScoringError> {
        self.classifier.predict(scaled)
    }
}

/// Map declared names onto known features and check the log schema can
/// produce every one of them.
pub fn resolve_features(names: &[String], schema: LogSchema) -> Result<Vec<Feature>, ModelError> {
    if names.is_empty() {
        return Err(ModelError::EmptySchema);
    }
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let feature =
            Feature::from_name(name).ok_or_else(|| ModelError::UnknownFeature(name.clone()))?;
        if !seen.insert(feature) {
            return Err(ModelError::DuplicateFeature(name.clone()));
        }
        if !feature.available_in(schema) {
            return Err(ModelError::FeatureUnavailable {
                feature: name.clone(),
                schema: schema.to_string(),
            });
        }
        out.push(feature);
    }
    Ok(out)
}
