//! Append-only block ledger: one address per line, no header.
//!
//! The in-memory set is rebuilt from the file on open, so blocking stays
//! idempotent across restarts. Dashboards read the file concurrently; every
//! entry is written with a single append of a complete line. A partial
//! trailing line left by an interrupted write is cut off on open, before
//! anything new is appended.

use crate::action::BlockAction;
use crate::error::LedgerError;
use crate::scoring::Verdict;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Append target for ledger lines. Returns only once the line is durable.
pub trait LedgerSink {
    fn append_line(&mut self, line: &[u8]) -> io::Result<()>;
}

impl LedgerSink for File {
    fn append_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.write_all(line)?;
        self.sync_data()
    }
}

pub struct BlockLedger {
    path: PathBuf,
    sink: Box<dyn LedgerSink>,
    blocked: HashSet<String>,
    action: Box<dyn BlockAction>,
}

impl BlockLedger {
    /// Open or create the ledger at `path` and load the addresses it holds.
    pub fn open(path: &Path, action: Box<dyn BlockAction>) -> Result<Self, LedgerError> {
        let open_err = |source| LedgerError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(open_err(e)),
        };
        let complete = complete_len(&data);

        let blocked: HashSet<String> = String::from_utf8_lossy(&data[..complete])
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;

        if complete < data.len() {
            warn!(
                path = %path.display(),
                partial = %String::from_utf8_lossy(&data[complete..]),
                "discarding unterminated trailing ledger line"
            );
            file.set_len(complete as u64)
                .and_then(|_| file.sync_data())
                .map_err(open_err)?;
        }

        info!(path = %path.display(), blocked = blocked.len(), "block ledger loaded");
        Ok(Self {
            path: path.to_path_buf(),
            sink: Box::new(file),
            blocked,
            action,
        })
    }

    /// Send new entries to `sink` instead of the file opened by [`open`].
    ///
    /// [`open`]: BlockLedger::open
    pub fn with_sink(mut self, sink: Box<dyn LedgerSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn contains(&self, address: &str) -> bool {
        self.blocked.contains(address)
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block every anomalous address not already blocked. Returns the number
    /// of new entries. A write failure is returned; a failed block action is
    /// only logged.
    pub fn apply(&mut self, verdicts: &[Verdict]) -> Result<usize, LedgerError> {
        let mut added = 0;
        for v in verdicts.iter().filter(|v| v.is_anomalous) {
            if self.blocked.contains(&v.address) {
                debug!(address = %v.address, "already blocked, skipping");
                continue;
            }
            if v.address.is_empty() || v.address.contains(['\n', '\r']) {
                warn!(address = ?v.address, "refusing to record unrepresentable address");
                continue;
            }

            self.append(&v.address)?;
            self.blocked.insert(v.address.clone());
            added += 1;

            if let Err(e) = self.action.notify_block(&v.address) {
                warn!(address = %v.address, error = %e, "block action failed; ledger entry kept");
            }
        }
        Ok(added)
    }

    fn append(&mut self, address: &str) -> Result<(), LedgerError> {
        let line = format!("{address}\n");
        self.sink
            .append_line(line.as_bytes())
            .map_err(|source| LedgerError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

/// Length of the prefix of `data` made of newline-terminated lines.
fn complete_len(data: &[u8]) -> usize {
    match data.last() {
        None | Some(b'\n') => data.len(),
        Some(_) => data
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1),
    }
}
