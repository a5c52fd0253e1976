//! Groups one cycle's records by address: records → per-address window → vector.

use super::FeatureVector;
use crate::ingest::{LogSchema, RequestRecord};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct AddressWindow<'a> {
    request_count: u32,
    paths: HashSet<&'a str>,
    countries: HashSet<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureAggregator {
    schema: LogSchema,
}

impl FeatureAggregator {
    pub fn new(schema: LogSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> LogSchema {
        self.schema
    }

    /// One vector per address present in `records`, in order of first
    /// appearance. Addresses absent from this batch produce nothing.
    pub fn aggregate(&self, records: &[RequestRecord]) -> Vec<FeatureVector> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut windows: Vec<(&str, AddressWindow<'_>)> = Vec::new();

        for r in records {
            let slot = *index.entry(r.address.as_str()).or_insert_with(|| {
                windows.push((r.address.as_str(), AddressWindow::default()));
                windows.len() - 1
            });
            let w = &mut windows[slot].1;
            w.request_count += 1;
            w.paths.insert(r.path.as_str());
            w.countries.insert(r.country.as_str());
        }

        let with_country = self.schema.has_country();
        windows
            .into_iter()
            .map(|(address, w)| FeatureVector {
                address: address.to_string(),
                request_count: w.request_count,
                unique_paths: w.paths.len() as u32,
                unique_countries: with_country.then(|| w.countries.len() as u32),
            })
            .collect()
    }
}
