//! IFRA harvester engine: fetching, strategy probing, pagination and export.
mod decode;
mod export;
mod extract;
mod fetch;
mod harvest;
mod persist;
mod prober;
mod progress;
mod strategy;
mod structured;
mod throttle;
mod types;
mod walker;

pub use decode::{decode_body, is_json_media_type, DecodeError, DecodedBody, EncodingSource};
pub use export::{CsvExporter, ExportError, ExportOptions, ExportSummary, IngredientSink};
pub use extract::{
    compile_selectors, is_header_label, ExtractError, ExtractedRows, NextPageDetector,
    RowExtractor, HEADER_LABELS,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use harvest::{HarvestError, HarvestReport, HarvestSettings, Harvester};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use prober::{ProbeMode, ProbeReport, StrategyProber, StrategyYield};
pub use progress::{LogSink, NullSink, ProgressSink};
pub use strategy::{
    Locator, PageParser, ParseError, ParsedPage, ResponseShape, Strategy, StrategyError,
    StrategyTable, DEFAULT_BASE_URL,
};
pub use structured::{parse_structured, StructuredError};
pub use throttle::{Throttle, DEFAULT_PAUSE};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestEvent, PageResult};
pub use walker::{PaginationWalker, WalkReport};
