//! Built-in classifier over standardized features: a row is an outlier when
//! any feature sits `threshold` or more standard deviations from the mean.

use super::{Classifier, LABEL_ANOMALOUS, LABEL_NORMAL};
use crate::error::{ModelError, ScoringError};
use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct ZScoreClassifier {
    threshold: f32,
}

impl ZScoreClassifier {
    pub fn new(threshold: f32) -> Result<Self, ModelError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ModelError::InvalidClassifier(format!(
                "zscore threshold must be a positive number, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Classifier for ZScoreClassifier {
    fn predict(&self, scaled: &Array2<f32>) -> Result<Vec<i64>, ScoringError> {
        Ok(scaled
            .rows()
            .into_iter()
            .map(|row| {
                if row.iter().any(|z| z.abs() >= self.threshold) {
                    LABEL_ANOMALOUS
                } else {
                    LABEL_NORMAL
                }
            })
            .collect())
    }
}
