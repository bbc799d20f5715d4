use std::collections::HashSet;

use engine_logging::{clear_context, engine_debug, engine_info, engine_warn, set_context};
use ifra_core::{decide, Continuation, PageObservation, Provenance, RawRecord, StopReason};
use url::Url;

use crate::decode::decode_body;
use crate::progress::ProgressSink;
use crate::strategy::{PageParser, Strategy, StrategyError};
use crate::throttle::Throttle;
use crate::{Fetcher, HarvestEvent, PageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkReport {
    pub strategy: String,
    pub records: Vec<RawRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
    /// Page 1 was fetched and parsed.
    pub first_page_ok: bool,
    pub nameless_dropped: usize,
    pub transport_failures: usize,
}

/// Repeated fetch + extract cycles for one strategy, strictly one page at a time.
pub struct PaginationWalker<'a> {
    fetcher: &'a dyn Fetcher,
    throttle: &'a Throttle,
    max_pages: u32,
}

struct PageCycle {
    result: PageResult,
    parsed: bool,
    nameless: usize,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, throttle: &'a Throttle, max_pages: u32) -> Self {
        Self {
            fetcher,
            throttle,
            max_pages,
        }
    }

    pub async fn walk(
        &self,
        base: &Url,
        strategy: &Strategy,
        sink: &dyn ProgressSink,
    ) -> Result<WalkReport, StrategyError> {
        let parser = strategy.compile()?;
        let mut report = WalkReport {
            strategy: strategy.name.clone(),
            records: Vec::new(),
            pages_fetched: 0,
            stop: StopReason::PageCeiling,
            first_page_ok: false,
            nameless_dropped: 0,
            transport_failures: 0,
        };

        // Cell fingerprints of every row seen so far in this walk.
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut page = 1;
        let stop = loop {
            set_context(&strategy.name, page);
            let url = match strategy.locator.page_url(base, page) {
                Ok(url) => url,
                Err(err) => {
                    clear_context();
                    return Err(err);
                }
            };

            self.throttle.ready().await;
            engine_debug!("GET {}", url);
            let cycle = self.cycle(&parser, strategy, &url, page).await;
            report.pages_fetched += 1;
            report.nameless_dropped += cycle.nameless;
            if page == 1 {
                report.first_page_ok = cycle.result.error.is_none() && cycle.parsed;
            }

            let rows = cycle.result.records.len();
            let new_rows = cycle
                .result
                .records
                .iter()
                .filter(|record| seen.insert(record.cells.clone()))
                .count();
            let observation = PageObservation {
                page,
                fetch_ok: cycle.result.error.is_none(),
                rows,
                new_rows,
                next_page: cycle.result.has_more,
                single_shot: strategy.locator.is_single_shot(),
            };

            match cycle.result.error {
                Some(error) => {
                    report.transport_failures += 1;
                    sink.emit(HarvestEvent::PageFailed {
                        strategy: strategy.name.clone(),
                        page,
                        error,
                    });
                }
                None => sink.emit(HarvestEvent::PageFetched {
                    strategy: strategy.name.clone(),
                    page,
                    rows: observation.rows,
                }),
            }
            if new_rows < rows {
                engine_debug!("{} of {} row(s) already seen", rows - new_rows, rows);
            }
            report.records.extend(cycle.result.records);

            match decide(&observation, self.max_pages) {
                Continuation::Continue => page += 1,
                Continuation::Stop(reason) => break reason,
            }
        };

        engine_info!(
            "Stopped after {} page(s): {} ({} rows)",
            report.pages_fetched,
            stop,
            report.records.len()
        );
        clear_context();
        report.stop = stop;
        Ok(report)
    }

    async fn cycle(
        &self,
        parser: &PageParser,
        strategy: &Strategy,
        url: &Url,
        page: u32,
    ) -> PageCycle {
        let output = match self.fetcher.fetch(url.as_str()).await {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("Fetch failed for {}: {}", url, err);
                return PageCycle {
                    result: PageResult::failed(err),
                    parsed: false,
                    nameless: 0,
                };
            }
        };

        let empty = PageCycle {
            result: PageResult::default(),
            parsed: false,
            nameless: 0,
        };
        let body = match decode_body(&output.bytes, output.metadata.content_type.as_deref()) {
            Ok(body) => body,
            Err(err) => {
                engine_warn!("Could not decode {}: {}", url, err);
                return empty;
            }
        };

        let provenance = Provenance {
            page,
            strategy: strategy.name.clone(),
        };
        match parser.parse(&body.text, &strategy.columns, &provenance) {
            Ok(parsed) => PageCycle {
                nameless: parsed.rows.nameless_dropped,
                result: PageResult {
                    records: parsed.rows.records,
                    has_more: parsed.has_more,
                    error: None,
                },
                parsed: true,
            },
            Err(err) => {
                engine_debug!("Nothing usable at {}: {}", url, err);
                empty
            }
        }
    }
}
