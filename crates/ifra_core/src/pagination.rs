use std::fmt;

use serde::Serialize;

pub const DEFAULT_MAX_PAGES: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TransportFailure,
    NoRows,
    NoNewRows,
    NoNextPage,
    SinglePage,
    PageCeiling,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TransportFailure => write!(f, "fetch failed"),
            StopReason::NoRows => write!(f, "no rows on page"),
            StopReason::NoNewRows => write!(f, "no new rows on page"),
            StopReason::NoNextPage => write!(f, "no next-page link"),
            StopReason::SinglePage => write!(f, "single-page source"),
            StopReason::PageCeiling => write!(f, "page ceiling reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Stop(StopReason),
}

/// What the walker saw on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageObservation {
    pub page: u32,
    pub fetch_ok: bool,
    pub rows: usize,
    /// Rows not already seen earlier in the same walk.
    pub new_rows: usize,
    /// `None` when the strategy declares no next-page affordance.
    pub next_page: Option<bool>,
    pub single_shot: bool,
}

/// Continuation decision, in priority order: fetch failure, empty page,
/// page of repeats, missing next link, single-shot source, page ceiling.
pub fn decide(observation: &PageObservation, max_pages: u32) -> Continuation {
    if !observation.fetch_ok {
        return Continuation::Stop(StopReason::TransportFailure);
    }
    if observation.rows == 0 {
        return Continuation::Stop(StopReason::NoRows);
    }
    if observation.new_rows == 0 {
        return Continuation::Stop(StopReason::NoNewRows);
    }
    if observation.next_page == Some(false) {
        return Continuation::Stop(StopReason::NoNextPage);
    }
    if observation.single_shot {
        return Continuation::Stop(StopReason::SinglePage);
    }
    if observation.page >= max_pages.max(1) {
        return Continuation::Stop(StopReason::PageCeiling);
    }
    Continuation::Continue
}
