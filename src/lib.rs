//! Traffic Sentinel: flags automated traffic in an access log and keeps a
//! durable, deduplicated block list.
//!
//! Modular structure:
//! - [`ingest`] — Access-log parsing, whole-file reads, seen-line cursor
//! - [`features`] — Per-address interval aggregation
//! - [`model`] — Scoring model artifacts (scaler + one-class classifier)
//! - [`scoring`] — Per-address verdicts
//! - [`storage`] — Append-only block ledger
//! - [`action`] — Block notifications to enforcement
//! - [`monitor`] — Poll loop
//! - [`logging`] — Structured logging setup

pub mod action;
pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod scoring;
pub mod storage;

pub use config::SentinelConfig;
pub use error::{Result, SentinelError};
pub use features::{Feature, FeatureAggregator, FeatureVector};
pub use ingest::{AccessLog, IngestionCursor, LogSchema, RequestRecord};
pub use logging::StructuredLogger;
pub use model::{FittedModel, ScoringModel};
pub use monitor::{CycleReport, Monitor, MonitorState, Tick};
pub use scoring::{AnomalyScorer, Verdict};
pub use storage::BlockLedger;
