use engine_logging::{engine_info, engine_warn};
use ifra_core::{ColumnMap, HarvestOutcome, RawRecord, StrategyOutcome};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::progress::ProgressSink;
use crate::strategy::StrategyTable;
use crate::walker::PaginationWalker;
use crate::HarvestEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Walk every viable strategy and pool the results.
    #[default]
    Pool,
    /// Stop after the first viable strategy.
    FirstViable,
}

/// Raw records one viable strategy produced, with the column map needed to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyYield {
    pub strategy: String,
    pub columns: ColumnMap,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub outcome: HarvestOutcome,
    pub outcomes: Vec<StrategyOutcome>,
    pub yields: Vec<StrategyYield>,
    pub transport_failures: usize,
    pub nameless_dropped: usize,
}

impl ProbeReport {
    pub fn record_count(&self) -> usize {
        self.yields.iter().map(|y| y.records.len()).sum()
    }
}

pub struct StrategyProber<'a> {
    walker: PaginationWalker<'a>,
    mode: ProbeMode,
}

impl<'a> StrategyProber<'a> {
    pub fn new(walker: PaginationWalker<'a>, mode: ProbeMode) -> Self {
        Self { walker, mode }
    }

    /// A strategy is viable when its first page is reachable, parseable and
    /// yields at least one record. Failing strategies are skipped, never fatal.
    pub async fn probe(
        &self,
        base: &Url,
        table: &StrategyTable,
        sink: &dyn ProgressSink,
    ) -> ProbeReport {
        let mut report = ProbeReport {
            outcome: HarvestOutcome::AllStrategiesExhausted,
            outcomes: Vec::new(),
            yields: Vec::new(),
            transport_failures: 0,
            nameless_dropped: 0,
        };

        for strategy in &table.strategies {
            sink.emit(HarvestEvent::StrategyStarted {
                strategy: strategy.name.clone(),
            });

            let outcome = match self.walker.walk(base, strategy, sink).await {
                Ok(walk) => {
                    let viable = walk.first_page_ok && !walk.records.is_empty();
                    report.transport_failures += walk.transport_failures;
                    report.nameless_dropped += walk.nameless_dropped;
                    let outcome = StrategyOutcome {
                        strategy: strategy.name.clone(),
                        viable,
                        pages_fetched: walk.pages_fetched,
                        records: walk.records.len(),
                        stop: Some(walk.stop),
                    };
                    if viable {
                        report.yields.push(StrategyYield {
                            strategy: strategy.name.clone(),
                            columns: strategy.columns,
                            records: walk.records,
                        });
                    }
                    outcome
                }
                Err(err) => {
                    engine_warn!("Strategy '{}' unusable: {}", strategy.name, err);
                    StrategyOutcome {
                        strategy: strategy.name.clone(),
                        viable: false,
                        pages_fetched: 0,
                        records: 0,
                        stop: None,
                    }
                }
            };

            let viable = outcome.viable;
            sink.emit(HarvestEvent::StrategyFinished(outcome.clone()));
            report.outcomes.push(outcome);

            if viable && self.mode == ProbeMode::FirstViable {
                break;
            }
        }

        if !report.yields.is_empty() {
            report.outcome = HarvestOutcome::Completed;
        } else {
            engine_warn!(
                "All {} strategies exhausted without a viable one",
                table.strategies.len()
            );
        }
        engine_info!(
            "Probe finished: {} viable strateg(ies), {} raw records",
            report.yields.len(),
            report.record_count()
        );
        report
    }
}
