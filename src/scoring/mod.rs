//! Per-address anomaly verdicts.

mod engine;

pub use engine::{AnomalyScorer, Verdict};
