//! Traffic Sentinel entrypoint. Polls the access log on a fixed interval, or
//! runs a single cycle when `poll_interval_secs` is 0.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use traffic_sentinel::{
    action,
    config::SentinelConfig,
    ingest::AccessLog,
    logging::StructuredLogger,
    model::{FittedModel, ScoringModel},
    monitor::Monitor,
    scoring::AnomalyScorer,
    storage::BlockLedger,
    SentinelError,
};

static STOP: AtomicBool = AtomicBool::new(false);

fn run() -> Result<(), SentinelError> {
    let config_path = std::env::var("SENTINEL_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = SentinelConfig::load(&config_path)?;

    StructuredLogger::init(&config.log);
    info!(
        access_log = %config.access_log.display(),
        block_ledger = %config.block_ledger.display(),
        schema = %config.schema,
        "traffic sentinel starting"
    );

    let model = FittedModel::load(&config.model_path, config.schema)?;
    let features: Vec<&str> = model.feature_names().iter().map(|f| f.name()).collect();
    info!(
        model = model.name(),
        version = model.version().unwrap_or("unversioned"),
        ?features,
        "scoring model loaded"
    );
    let scorer = AnomalyScorer::new(Arc::new(model));

    let block_action = action::from_config(&config.block_action)?;
    let ledger = BlockLedger::open(&config.block_ledger, block_action)?;

    let mut monitor = Monitor::new(
        AccessLog::new(&config.access_log),
        config.schema,
        scorer,
        ledger,
        Duration::from_secs(config.cycle_timeout_secs),
    )?;

    if config.run_once() {
        let tick = monitor.tick()?;
        info!(?tick, "single cycle complete");
        return Ok(());
    }

    if let Err(e) = ctrlc::set_handler(|| STOP.store(true, Ordering::Relaxed)) {
        tracing::warn!(error = %e, "cannot install Ctrl+C handler");
    }
    info!(interval_secs = config.poll_interval_secs, "polling (Ctrl+C to stop)");
    monitor.run(Duration::from_secs(config.poll_interval_secs), &STOP)
}

fn main() {
    if let Err(e) = run() {
        error!(error = %e, "fatal");
        eprintln!("traffic-sentinel: {e}");
        std::process::exit(1);
    }
}
