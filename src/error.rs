//! Error types for the sentinel pipeline.
//!
//! Recoverable conditions (malformed lines, missing access log, failed block
//! notifications) never show up here as errors escaping a tick; everything
//! that reaches [`SentinelError`] is fatal.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Model artifact could not be loaded or does not fit the active log schema.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("cannot read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown feature name in model schema: {0}")]
    UnknownFeature(String),

    #[error("feature {0} listed twice in model schema")]
    DuplicateFeature(String),

    #[error("model expects feature {feature}, which the {schema} log schema does not produce")]
    FeatureUnavailable { feature: String, schema: String },

    #[error("model declares no features")]
    EmptySchema,

    #[error("scaler {field} has {got} values, model declares {expected} features")]
    ScalerShape {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("scaler contains a non-finite value")]
    ScalerNotFinite,

    #[error("classifier file not found: {0}")]
    ClassifierMissing(PathBuf),

    #[error("classifier input width {got} does not match {expected} declared features")]
    InputWidth { expected: usize, got: usize },

    #[error("invalid classifier: {0}")]
    InvalidClassifier(String),

    #[error("onnx runtime: {0}")]
    Onnx(#[from] ort::OrtError),
}

/// Scoring failed after the model was loaded.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("onnx runtime: {0}")]
    Onnx(#[from] ort::OrtError),

    #[error("classifier returned {got} labels for {expected} rows")]
    LabelCount { expected: usize, got: usize },

    #[error("classifier returned label {0}, expected 1 or -1")]
    UnexpectedLabel(i64),

    #[error("feature matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// The durable block ledger could not be opened or written.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("cannot open block ledger {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot append to block ledger {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The external block action failed. Logged by the ledger, never fatal.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("enforcement endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Fatal pipeline error; the binary exits non-zero on any of these.
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("cycle exceeded {0:?} in aggregation/scoring")]
    CycleTimeout(Duration),

    #[error("scoring worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SentinelError>;
