//! Per-address behavioral features over one polling interval.

mod aggregate;

pub use aggregate::FeatureAggregator;

use crate::ingest::LogSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named feature a model can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    RequestCount,
    UniquePaths,
    UniqueCountries,
}

impl Feature {
    pub const ALL: [Feature; 3] = [
        Feature::RequestCount,
        Feature::UniquePaths,
        Feature::UniqueCountries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::RequestCount => "request_count",
            Feature::UniquePaths => "unique_paths",
            Feature::UniqueCountries => "unique_countries",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether `schema` carries the fields this feature is computed from.
    pub fn available_in(self, schema: LogSchema) -> bool {
        match self {
            Feature::RequestCount | Feature::UniquePaths => true,
            Feature::UniqueCountries => schema.has_country(),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate for one address over the records ingested in a single cycle.
/// Never cumulative: the classifier was fit on interval-level numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub address: String,
    pub request_count: u32,
    pub unique_paths: u32,
    /// `None` under the four-field schema
    pub unique_countries: Option<u32>,
}

impl FeatureVector {
    pub fn value(&self, feature: Feature) -> Option<f32> {
        match feature {
            Feature::RequestCount => Some(self.request_count as f32),
            Feature::UniquePaths => Some(self.unique_paths as f32),
            Feature::UniqueCountries => self.unique_countries.map(|c| c as f32),
        }
    }

    /// Project onto `order`. Every feature must be present; the model schema is
    /// checked against the log schema at startup.
    pub fn project(&self, order: &[Feature]) -> Vec<f32> {
        order
            .iter()
            .map(|&f| {
                let v = self.value(f);
                debug_assert!(v.is_some(), "feature {f} missing for {}", self.address);
                v.unwrap_or(0.0)
            })
            .collect()
    }
}
