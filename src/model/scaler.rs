//! Standard scaling with parameters fitted offline: `(x - mean) / scale`.

use super::ScalerParams;
use crate::error::ModelError;
use ndarray::{Array1, Array2};

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f32>,
    scale: Array1<f32>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self, ModelError> {
        if mean.len() != scale.len() {
            return Err(ModelError::ScalerShape {
                field: "scale",
                expected: mean.len(),
                got: scale.len(),
            });
        }
        if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::ScalerNotFinite);
        }
        // constant features are fitted with scale 0; divide by 1 instead
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();
        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    /// Pass-through scaler (mean 0, scale 1).
    pub fn identity(width: usize) -> Self {
        Self {
            mean: Array1::zeros(width),
            scale: Array1::ones(width),
        }
    }

    pub fn from_params(params: &ScalerParams, expected: usize) -> Result<Self, ModelError> {
        for (field, values) in [("mean", &params.mean), ("scale", &params.scale)] {
            if values.len() != expected {
                return Err(ModelError::ScalerShape {
                    field,
                    expected,
                    got: values.len(),
                });
            }
        }
        Self::new(
            params.mean.iter().map(|&v| v as f32).collect(),
            params.scale.iter().map(|&v| v as f32).collect(),
        )
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, mut x: Array2<f32>) -> Array2<f32> {
        debug_assert_eq!(x.ncols(), self.width());
        for mut row in x.rows_mut() {
            row -= &self.mean;
            row /= &self.scale;
        }
        x
    }
}
