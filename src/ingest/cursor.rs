//! Seen-line bookkeeping across polling cycles.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

type LineDigest = [u8; 32];

/// Tracks which raw lines were already handed to aggregation.
///
/// Membership is by exact line content. Lines are kept as SHA-256 digests, so
/// each entry costs 32 bytes no matter how long the line is. The set lives for
/// the process only; a restart re-reads the whole log once.
#[derive(Debug, Default)]
pub struct IngestionCursor {
    seen: HashSet<LineDigest>,
}

impl IngestionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    fn digest(line: &str) -> LineDigest {
        let mut h = Sha256::new();
        h.update(line.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&h.finalize());
        out
    }

    /// Return the lines never seen before, in input order, and mark them seen.
    /// A line repeated inside `lines` is returned once.
    pub fn filter_unseen<'a, I>(&mut self, lines: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter(|line| self.seen.insert(Self::digest(line)))
            .collect()
    }

    pub fn is_seen(&self, line: &str) -> bool {
        self.seen.contains(&Self::digest(line))
    }

    /// Number of distinct lines seen so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
