//! Poll loop: read log → unseen lines → parse → aggregate → score → ledger.
//!
//! Two states. `WaitingForLog` until the access log first appears, then
//! `Polling` for good. A log that vanishes while polling just means no new
//! data for that tick; the monitor does not go back to waiting.
//!
//! Cycles run one at a time on the calling thread. Aggregation and scoring
//! are handed to a blocking worker under a timeout; a breach is fatal.

use crate::error::{Result, SentinelError};
use crate::features::FeatureAggregator;
use crate::ingest::{self, AccessLog, IngestionCursor, LogSchema, RequestRecord};
use crate::scoring::{AnomalyScorer, Verdict};
use crate::storage::BlockLedger;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    WaitingForLog,
    Polling,
}

/// Counters for one cycle that had unseen lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub new_lines: usize,
    pub records: usize,
    pub dropped: usize,
    pub addresses: usize,
    pub anomalies: usize,
    pub new_blocks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Access log not created yet
    Waiting,
    /// Log absent, unreadable, or nothing new in it
    Idle,
    Cycle(CycleReport),
}

pub struct Monitor {
    log: AccessLog,
    schema: LogSchema,
    cursor: IngestionCursor,
    aggregator: FeatureAggregator,
    scorer: AnomalyScorer,
    ledger: BlockLedger,
    state: MonitorState,
    cycle_timeout: Duration,
    runtime: Option<Runtime>,
}

impl Monitor {
    pub fn new(
        log: AccessLog,
        schema: LogSchema,
        scorer: AnomalyScorer,
        ledger: BlockLedger,
        cycle_timeout: Duration,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sentinel-cycle")
            .enable_time()
            .build()
            .map_err(SentinelError::Runtime)?;
        Ok(Self {
            log,
            schema,
            cursor: IngestionCursor::new(),
            aggregator: FeatureAggregator::new(schema),
            scorer,
            ledger,
            state: MonitorState::WaitingForLog,
            cycle_timeout,
            runtime: Some(runtime),
        })
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn cursor(&self) -> &IngestionCursor {
        &self.cursor
    }

    pub fn ledger(&self) -> &BlockLedger {
        &self.ledger
    }

    /// One polling cycle. Only fatal conditions come back as `Err`.
    pub fn tick(&mut self) -> Result<Tick> {
        if self.state == MonitorState::WaitingForLog {
            if !self.log.exists() {
                debug!(path = %self.log.path().display(), "access log not present yet");
                return Ok(Tick::Waiting);
            }
            info!(path = %self.log.path().display(), "access log found; polling");
            self.state = MonitorState::Polling;
        }

        let content = match self.log.read() {
            Ok(Some(c)) => c,
            Ok(None) => {
                debug!(path = %self.log.path().display(), "access log disappeared; no new data");
                return Ok(Tick::Idle);
            }
            Err(e) => {
                warn!(path = %self.log.path().display(), error = %e, "cannot read access log");
                return Ok(Tick::Idle);
            }
        };

        let unseen = self.cursor.filter_unseen(AccessLog::complete_lines(&content));
        if unseen.is_empty() {
            return Ok(Tick::Idle);
        }

        let (records, dropped) = ingest::parse_lines(unseen.iter().copied(), self.schema);
        let mut report = CycleReport {
            new_lines: unseen.len(),
            records: records.len(),
            dropped,
            ..CycleReport::default()
        };
        if records.is_empty() {
            return Ok(Tick::Cycle(report));
        }

        let (addresses, verdicts) = self.score_bounded(records)?;
        report.addresses = addresses;
        report.anomalies = verdicts.iter().filter(|v| v.is_anomalous).count();
        if report.anomalies > 0 {
            info!(anomalies = report.anomalies, "anomalous addresses detected");
        }

        report.new_blocks = self.ledger.apply(&verdicts)?;
        Ok(Tick::Cycle(report))
    }

    fn score_bounded(&mut self, records: Vec<RequestRecord>) -> Result<(usize, Vec<Verdict>)> {
        let aggregator = self.aggregator;
        let scorer = self.scorer.clone();
        let limit = self.cycle_timeout;

        let outcome = {
            let runtime = self.runtime.as_ref().ok_or_else(|| {
                SentinelError::Runtime(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "cycle runtime shut down after a timeout",
                ))
            })?;
            runtime.block_on(async move {
                let worker = tokio::task::spawn_blocking(move || {
                    let vectors = aggregator.aggregate(&records);
                    scorer.score(&vectors).map(|v| (vectors.len(), v))
                });
                tokio::time::timeout(limit, worker).await
            })
        };

        match outcome {
            Ok(joined) => Ok(joined??),
            Err(_) => {
                // the stuck worker cannot be cancelled; leave it behind
                if let Some(rt) = self.runtime.take() {
                    rt.shutdown_background();
                }
                Err(SentinelError::CycleTimeout(limit))
            }
        }
    }

    /// Poll until `stop` is set. `interval` is slept between cycles in steps of
    /// at most one second so a stop request is noticed promptly.
    pub fn run(&mut self, interval: Duration, stop: &AtomicBool) -> Result<()> {
        let mut cycle: u64 = 0;
        let mut announced_wait = false;
        while !stop.load(Ordering::Relaxed) {
            cycle += 1;
            match self.tick()? {
                Tick::Waiting if !announced_wait => {
                    info!(path = %self.log.path().display(), "no access log yet; waiting");
                    announced_wait = true;
                }
                Tick::Cycle(report) => {
                    info!(
                        cycle,
                        new_lines = report.new_lines,
                        records = report.records,
                        dropped = report.dropped,
                        addresses = report.addresses,
                        anomalies = report.anomalies,
                        new_blocks = report.new_blocks,
                        "cycle complete"
                    );
                }
                _ => {}
            }

            let mut remaining = interval;
            while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
                let step = remaining.min(Duration::from_secs(1));
                std::thread::sleep(step);
                remaining -= step;
            }
        }
        info!(cycle, "monitor stopping");
        Ok(())
    }
}
