use engine_logging::{engine_debug, engine_warn};
use ifra_core::{clean_text, ColumnMap, Provenance, RawRecord};
use scraper::{ElementRef, Html, Selector};

/// First-cell labels that mark a header or decoration row.
pub const HEADER_LABELS: &[&str] = &["ingredient", "name", "cas", "category"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no candidate row selector matched the document")]
    NoRowsFound,
    #[error("none of the selectors compiled: {0:?}")]
    NoValidSelectors(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedRows {
    pub records: Vec<RawRecord>,
    pub headers_skipped: usize,
    /// Rows dropped because the name column was empty.
    pub nameless_dropped: usize,
}

/// Compile selector strings, skipping (and logging) any that fail to parse.
pub fn compile_selectors(sources: &[String]) -> Result<Vec<Selector>, ExtractError> {
    let selectors: Vec<Selector> = sources
        .iter()
        .filter_map(|source| match Selector::parse(source) {
            Ok(selector) => Some(selector),
            Err(err) => {
                engine_warn!("Skipping invalid selector '{}': {}", source, err);
                None
            }
        })
        .collect();

    if selectors.is_empty() {
        return Err(ExtractError::NoValidSelectors(sources.to_vec()));
    }
    Ok(selectors)
}

pub fn is_header_label(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    HEADER_LABELS.iter().any(|label| {
        lowered == *label
            || lowered
                .strip_prefix(label)
                .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// Locates record rows in a parsed listing page and turns them into raw cell tuples.
#[derive(Debug)]
pub struct RowExtractor {
    row_selectors: Vec<Selector>,
    cell: Selector,
    header_cell: Selector,
}

impl RowExtractor {
    /// `row_selectors` are tried in order; the first one with a match is used.
    pub fn new(row_selectors: &[String]) -> Result<Self, ExtractError> {
        Ok(Self {
            row_selectors: compile_selectors(row_selectors)?,
            cell: Selector::parse("td, th").expect("static selector"),
            header_cell: Selector::parse("th").expect("static selector"),
        })
    }

    pub fn extract(
        &self,
        doc: &Html,
        columns: &ColumnMap,
        provenance: &Provenance,
    ) -> Result<ExtractedRows, ExtractError> {
        let rows: Vec<ElementRef> = self
            .row_selectors
            .iter()
            .map(|sel| doc.select(sel).collect::<Vec<_>>())
            .find(|rows| !rows.is_empty())
            .ok_or(ExtractError::NoRowsFound)?;

        let mut out = ExtractedRows::default();
        for row in rows {
            if row.select(&self.header_cell).next().is_some() {
                out.headers_skipped += 1;
                continue;
            }

            let cells: Vec<String> = row
                .select(&self.cell)
                .map(|cell| clean_text(&cell.text().collect::<String>()))
                .collect();

            if cells.first().is_some_and(|first| is_header_label(first)) {
                out.headers_skipped += 1;
                continue;
            }

            let record = RawRecord::new(cells, provenance.clone());
            if columns.name_of(&record).is_none() {
                out.nameless_dropped += 1;
                continue;
            }
            out.records.push(record);
        }

        engine_debug!(
            "Extracted {} rows ({} header, {} nameless)",
            out.records.len(),
            out.headers_skipped,
            out.nameless_dropped
        );
        Ok(out)
    }
}

/// Detects an explicit "next page" link.
#[derive(Debug)]
pub struct NextPageDetector {
    selectors: Vec<Selector>,
}

impl NextPageDetector {
    pub fn new(selectors: &[String]) -> Result<Self, ExtractError> {
        Ok(Self {
            selectors: compile_selectors(selectors)?,
        })
    }

    pub fn has_next_page(&self, doc: &Html) -> bool {
        self.selectors
            .iter()
            .any(|sel| doc.select(sel).next().is_some())
    }
}
