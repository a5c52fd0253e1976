//! ONNX Runtime classifier. Input: `[n, features]` f32, output: integer label
//! per row using the one-class convention (1 inlier, -1 outlier).
//! Works for any exported one-class model: isolation forest, one-class SVM,
//! local outlier factor.

use super::Classifier;
use crate::error::{ModelError, ScoringError};
use ndarray::{Array2, CowArray};
use ort::tensor::OrtOwnedTensor;
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static ORT_ENV: OnceLock<Arc<Environment>> = OnceLock::new();

fn init_env() -> Result<Arc<Environment>, ort::OrtError> {
    if let Some(env) = ORT_ENV.get() {
        return Ok(env.clone());
    }
    let env = Environment::builder()
        .with_name("traffic-sentinel")
        .with_log_level(LoggingLevel::Warning)
        .build()?
        .into_arc();
    Ok(ORT_ENV.get_or_init(|| env).clone())
}

pub struct OnnxClassifier {
    session: Session,
    label_index: usize,
}

impl OnnxClassifier {
    /// Load the graph at `path` and check its input width against the
    /// declared feature count.
    pub fn load(path: &Path, feature_count: usize, label_output: &str) -> Result<Self, ModelError> {
        if !path.is_file() {
            return Err(ModelError::ClassifierMissing(path.to_path_buf()));
        }
        let env = init_env()?;
        let session = SessionBuilder::new(&env)?
            .with_optimization_level(GraphOptimizationLevel::Level1)?
            .with_intra_threads(1)?
            .with_model_from_file(path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ModelError::InvalidClassifier("graph declares no inputs".into()))?;
        if let Some(Some(width)) = input.dimensions.last() {
            if *width as usize != feature_count {
                return Err(ModelError::InputWidth {
                    expected: feature_count,
                    got: *width as usize,
                });
            }
        }

        let outputs: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
        let label_index = Self::label_index(&outputs, label_output)?;

        tracing::info!(
            path = %path.display(),
            input = %input.name,
            label_output,
            "onnx classifier loaded"
        );

        Ok(Self {
            session,
            label_index,
        })
    }

    /// Position of `label_output` among the graph's output names.
    pub fn label_index(outputs: &[&str], label_output: &str) -> Result<usize, ModelError> {
        outputs
            .iter()
            .position(|name| *name == label_output)
            .ok_or_else(|| {
                ModelError::InvalidClassifier(format!(
                    "no output named {label_output} (graph outputs: {})",
                    outputs.join(", ")
                ))
            })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, scaled: &Array2<f32>) -> Result<Vec<i64>, ScoringError> {
        let rows = scaled.nrows();
        let input = CowArray::from(scaled.view().into_dyn());
        let outputs = self
            .session
            .run(vec![Value::from_array(self.session.allocator(), &input)?])?;

        let out = outputs.get(self.label_index).ok_or(ScoringError::LabelCount {
            expected: rows,
            got: 0,
        })?;
        let labels: OrtOwnedTensor<i64, _> = out.try_extract()?;
        Ok(labels.view().iter().copied().collect())
    }
}
