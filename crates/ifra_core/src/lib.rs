//! IFRA harvester core: pure domain types, classification, deduplication
//! and pagination decisions. No IO.
mod category;
mod classify;
mod harvest_state;
mod pagination;
mod record;
mod summary;

pub use category::Category;
pub use classify::{
    Classifier, DescriptionRule, HintRule, KeywordRule, DEFAULT_DESCRIPTION, DESCRIPTION_RULES,
    HINT_RULES, KEYWORD_RULES, UNMATCHED_HINT,
};
pub use harvest_state::{FoldOutcome, HarvestState};
pub use pagination::{decide, Continuation, PageObservation, StopReason, DEFAULT_MAX_PAGES};
pub use record::{
    clean_text, is_cas_number, is_ncs_code, CodePolicy, ColumnMap, Ingredient, KeyPolicy,
    Provenance, RawRecord, RecordFields,
};
pub use summary::{HarvestOutcome, HarvestSummary, StrategyOutcome};
