use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use ifra_core::{
    Classifier, FoldOutcome, HarvestOutcome, HarvestState, HarvestSummary, Ingredient,
    DEFAULT_MAX_PAGES,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::prober::{ProbeMode, StrategyProber, StrategyYield};
use crate::progress::ProgressSink;
use crate::strategy::{StrategyTable, DEFAULT_BASE_URL};
use crate::throttle::{Throttle, DEFAULT_PAUSE};
use crate::walker::PaginationWalker;
use crate::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    pub base_url: String,
    pub max_pages: u32,
    /// Minimum pause between consecutive fetches.
    pub pause_ms: u64,
    pub mode: ProbeMode,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            pause_ms: DEFAULT_PAUSE.as_millis() as u64,
            mode: ProbeMode::Pool,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("invalid base url {url}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Everything one run collected. Partial results are the normal case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub ingredients: Vec<Ingredient>,
    pub summary: HarvestSummary,
}

impl HarvestReport {
    pub fn outcome(&self) -> HarvestOutcome {
        self.summary.outcome
    }
}

pub struct Harvester {
    fetcher: Arc<dyn Fetcher>,
    settings: HarvestSettings,
    table: StrategyTable,
    classifier: Classifier,
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: HarvestSettings, table: StrategyTable) -> Self {
        Self {
            fetcher,
            settings,
            table,
            classifier: Classifier::default(),
        }
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Probe, walk, normalize, deduplicate and summarize.
    pub async fn run(&self, sink: &dyn ProgressSink) -> Result<HarvestReport, HarvestError> {
        let base = Url::parse(&self.settings.base_url).map_err(|err| HarvestError::BaseUrl {
            url: self.settings.base_url.clone(),
            reason: err.to_string(),
        })?;
        engine_info!(
            "Harvesting {} with {} candidate strategies (mode {:?}, max {} pages, pause {} ms)",
            base,
            self.table.strategies.len(),
            self.settings.mode,
            self.settings.max_pages,
            self.settings.pause_ms
        );

        let throttle = Throttle::new(Duration::from_millis(self.settings.pause_ms));
        let walker =
            PaginationWalker::new(self.fetcher.as_ref(), &throttle, self.settings.max_pages);
        let probe = StrategyProber::new(walker, self.settings.mode)
            .probe(&base, &self.table, sink)
            .await;

        let mut state = HarvestState::new();
        state.note_malformed(probe.nameless_dropped);
        for batch in probe.yields {
            self.absorb(&mut state, batch);
        }

        let summary = HarvestSummary::from_state(
            &state,
            probe.outcome,
            probe.outcomes,
            probe.transport_failures,
        );
        engine_info!(
            "Harvest {:?}: {} ingredients ({} with key, {} duplicates dropped)",
            summary.outcome,
            summary.total,
            summary.with_key,
            summary.duplicates_dropped
        );
        Ok(HarvestReport {
            ingredients: state.into_records(),
            summary,
        })
    }

    /// Runs [`Harvester::run`] on a fresh current-thread runtime.
    pub fn run_blocking(&self, sink: &dyn ProgressSink) -> Result<HarvestReport, HarvestError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(sink))
    }

    fn absorb(&self, state: &mut HarvestState, batch: StrategyYield) {
        let StrategyYield {
            strategy,
            columns,
            records,
        } = batch;
        let mut inserted = 0usize;
        for record in records {
            state.note_raw_row();
            let Some(ingredient) = columns
                .project(&record)
                .and_then(|fields| self.classifier.ingredient(fields))
            else {
                state.note_malformed(1);
                continue;
            };
            match state.fold(ingredient) {
                FoldOutcome::Inserted => inserted += 1,
                outcome => {
                    engine_debug!(
                        "Dropped {:?} from '{}' page {}",
                        outcome,
                        strategy,
                        record.provenance.page
                    );
                }
            }
        }
        engine_info!("Strategy '{}' contributed {} new ingredients", strategy, inserted);
    }
}
