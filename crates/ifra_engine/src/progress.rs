use engine_logging::{engine_info, engine_warn};

use crate::HarvestEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: HarvestEvent) {}
}

/// Writes events to the global logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::StrategyStarted { strategy } => {
                engine_info!("Probing strategy '{}'", strategy);
            }
            HarvestEvent::PageFetched {
                strategy,
                page,
                rows,
            } => {
                engine_info!("{} page {}: {} rows", strategy, page, rows);
            }
            HarvestEvent::PageFailed {
                strategy,
                page,
                error,
            } => {
                engine_warn!("{} page {} failed: {}", strategy, page, error);
            }
            HarvestEvent::StrategyFinished(outcome) => {
                let stop = outcome
                    .stop
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                engine_info!(
                    "Strategy '{}' finished: viable={} pages={} records={} stop={}",
                    outcome.strategy,
                    outcome.viable,
                    outcome.pages_fetched,
                    outcome.records,
                    stop
                );
            }
        }
    }
}
