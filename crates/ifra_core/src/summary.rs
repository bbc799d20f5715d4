use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Category, HarvestState, StopReason};

/// Result of walking one candidate strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyOutcome {
    pub strategy: String,
    pub viable: bool,
    pub pages_fetched: u32,
    pub records: usize,
    pub stop: Option<StopReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestOutcome {
    Completed,
    /// No strategy produced a record. Reported, not fatal.
    AllStrategiesExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    pub outcome: HarvestOutcome,
    pub total: usize,
    pub per_category: BTreeMap<String, usize>,
    pub with_key: usize,
    pub without_key: usize,
    pub with_category_code: usize,
    pub raw_rows: usize,
    pub malformed_dropped: usize,
    pub duplicates_dropped: usize,
    pub pages_fetched: u32,
    pub transport_failures: usize,
    pub strategies: Vec<StrategyOutcome>,
}

impl HarvestSummary {
    pub fn from_state(
        state: &HarvestState,
        outcome: HarvestOutcome,
        strategies: Vec<StrategyOutcome>,
        transport_failures: usize,
    ) -> Self {
        let per_category = Category::ALL
            .into_iter()
            .map(|c| (c.label().to_string(), state.count_in(c)))
            .filter(|(_, n)| *n > 0)
            .collect();
        let with_key = state.records().iter().filter(|r| r.has_key()).count();
        let with_category_code = state
            .records()
            .iter()
            .filter(|r| r.regulatory_category_code().is_some())
            .count();

        Self {
            outcome,
            total: state.len(),
            per_category,
            with_key,
            without_key: state.len() - with_key,
            with_category_code,
            raw_rows: state.raw_rows(),
            malformed_dropped: state.malformed(),
            duplicates_dropped: state.duplicates(),
            pages_fetched: strategies.iter().map(|s| s.pages_fetched).sum(),
            transport_failures,
            strategies,
        }
    }

    /// Category counts, largest first.
    pub fn category_breakdown(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<_> = self
            .per_category
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        rows
    }
}
