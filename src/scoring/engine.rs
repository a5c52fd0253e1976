//! Projects feature vectors onto the model schema, scales, classifies, and maps
//! the one-class label convention to per-address verdicts.

use crate::error::ScoringError;
use crate::features::FeatureVector;
use crate::model::{ScoringModel, LABEL_ANOMALOUS, LABEL_NORMAL};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scorer output for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub address: String,
    pub is_anomalous: bool,
}

#[derive(Clone)]
pub struct AnomalyScorer {
    model: Arc<dyn ScoringModel>,
}

impl AnomalyScorer {
    pub fn new(model: Arc<dyn ScoringModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn ScoringModel {
        self.model.as_ref()
    }

    /// Build the `[n, features]` matrix in the model's declared column order.
    pub fn feature_matrix(&self, vectors: &[FeatureVector]) -> Result<Array2<f32>, ScoringError> {
        let order = self.model.feature_names();
        let flat: Vec<f32> = vectors.iter().flat_map(|v| v.project(order)).collect();
        Ok(Array2::from_shape_vec((vectors.len(), order.len()), flat)?)
    }

    pub fn score(&self, vectors: &[FeatureVector]) -> Result<Vec<Verdict>, ScoringError> {
        if vectors.is_empty() {
            return Ok(Vec::new());
        }
        let x = self.feature_matrix(vectors)?;
        tracing::debug!(features = ?x, "feature matrix");

        let scaled = self.model.transform(x);
        let labels = self.model.predict(&scaled)?;
        tracing::debug!(?labels, "model predictions");

        if labels.len() != vectors.len() {
            return Err(ScoringError::LabelCount {
                expected: vectors.len(),
                got: labels.len(),
            });
        }

        vectors
            .iter()
            .zip(labels)
            .map(|(v, label)| {
                let is_anomalous = match label {
                    LABEL_ANOMALOUS => true,
                    LABEL_NORMAL => false,
                    other => return Err(ScoringError::UnexpectedLabel(other)),
                };
                Ok(Verdict {
                    address: v.address.clone(),
                    is_anomalous,
                })
            })
            .collect()
    }
}
