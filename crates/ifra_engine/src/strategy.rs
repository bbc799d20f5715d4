//! Declarative access strategies.
//!
//! A strategy is plain data: how to address page N, what the response looks
//! like, and how cells map to fields. Adding a source variant means adding a
//! table entry, which is why every type here round-trips through serde.

use ifra_core::{ColumnMap, Provenance};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extract::{ExtractError, ExtractedRows, NextPageDetector, RowExtractor};
use crate::structured::{parse_structured, StructuredError};

pub const DEFAULT_BASE_URL: &str = "https://acc.ifrafragrance.org/transparency-list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// One document, resolved relative to the base URL.
    Fixed { path: String },
    /// `?{param}={index}`. With `bare_first`, page 1 is the base URL itself.
    Query {
        param: String,
        #[serde(default = "default_start")]
        start: u32,
        #[serde(default)]
        bare_first: bool,
    },
    /// `{base}/{prefix}/{index}`.
    Path {
        prefix: String,
        #[serde(default = "default_start")]
        start: u32,
    },
    /// `?{param}={(page - 1) * page_size}`.
    Offset { param: String, page_size: u32 },
}

fn default_start() -> u32 {
    1
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("cannot build address for page {page} from {base}: {reason}")]
    Locator {
        base: String,
        page: u32,
        reason: String,
    },
    #[error(transparent)]
    Selectors(#[from] ExtractError),
}

impl Locator {
    pub fn is_single_shot(&self) -> bool {
        matches!(self, Locator::Fixed { .. })
    }

    /// Address of 1-based `page`.
    pub fn page_url(&self, base: &Url, page: u32) -> Result<Url, StrategyError> {
        let fail = |reason: String| StrategyError::Locator {
            base: base.to_string(),
            page,
            reason,
        };
        let offset = page.saturating_sub(1);

        match self {
            Locator::Fixed { path } => base.join(path).map_err(|e| fail(e.to_string())),
            Locator::Query {
                param,
                start,
                bare_first,
            } => {
                let mut url = base.clone();
                if !(*bare_first && page <= 1) {
                    url.query_pairs_mut()
                        .append_pair(param, &(start + offset).to_string());
                }
                Ok(url)
            }
            Locator::Path { prefix, start } => {
                let mut url = base.clone();
                url.path_segments_mut()
                    .map_err(|_| fail("base URL cannot carry path segments".into()))?
                    .pop_if_empty()
                    .push(prefix)
                    .push(&(start + offset).to_string());
                Ok(url)
            }
            Locator::Offset { param, page_size } => {
                let mut url = base.clone();
                url.query_pairs_mut()
                    .append_pair(param, &(offset * page_size).to_string());
                Ok(url)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseShape {
    Markup {
        row_selectors: Vec<String>,
        /// Empty when the source exposes no next-page link.
        #[serde(default)]
        next_page_selectors: Vec<String>,
    },
    Structured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub locator: Locator,
    pub shape: ResponseShape,
    #[serde(default = "ColumnMap::canonical")]
    pub columns: ColumnMap,
}

/// Page parser compiled once per walk.
#[derive(Debug)]
pub enum PageParser {
    Markup {
        rows: RowExtractor,
        next: Option<NextPageDetector>,
    },
    Structured,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPage {
    pub rows: ExtractedRows,
    pub has_more: Option<bool>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Markup(#[from] ExtractError),
    #[error(transparent)]
    Structured(#[from] StructuredError),
    #[error("key column does not hold CAS numbers; layout does not fit these rows")]
    ColumnMismatch,
}

impl Strategy {
    pub fn compile(&self) -> Result<PageParser, StrategyError> {
        match &self.shape {
            ResponseShape::Markup {
                row_selectors,
                next_page_selectors,
            } => {
                let next = if next_page_selectors.is_empty() {
                    None
                } else {
                    Some(NextPageDetector::new(next_page_selectors)?)
                };
                Ok(PageParser::Markup {
                    rows: RowExtractor::new(row_selectors)?,
                    next,
                })
            }
            ResponseShape::Structured => Ok(PageParser::Structured),
        }
    }
}

impl PageParser {
    pub fn parse(
        &self,
        body: &str,
        columns: &ColumnMap,
        provenance: &Provenance,
    ) -> Result<ParsedPage, ParseError> {
        let parsed = match self {
            PageParser::Markup { rows, next } => {
                let doc = Html::parse_document(body);
                let rows = rows.extract(&doc, columns, provenance)?;
                let has_more = next.as_ref().map(|n| n.has_next_page(&doc));
                ParsedPage { rows, has_more }
            }
            PageParser::Structured => ParsedPage {
                rows: parse_structured(body, columns, provenance)?,
                has_more: None,
            },
        };
        if !columns.layout_fits(&parsed.rows.records) {
            return Err(ParseError::ColumnMismatch);
        }
        Ok(parsed)
    }
}

/// Ranked candidate strategies, probed in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyTable {
    pub strategies: Vec<Strategy>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StrategyTable {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Known access patterns for the IFRA transparency list, most structured first.
    pub fn ifra_default() -> Self {
        let structured = |name: &str, path: &str| Strategy {
            name: name.to_string(),
            locator: Locator::Fixed {
                path: path.to_string(),
            },
            shape: ResponseShape::Structured,
            columns: ColumnMap::canonical(),
        };
        let styled_rows = strings(&[
            "table.views-table tbody tr",
            "table tbody tr",
            "tr.views-row",
            "tr.odd, tr.even",
        ]);
        let next_links = strings(&[
            "a[rel=\"next\"]",
            ".pager-next a",
            ".pagination .next a",
            "li.next a",
            ".pager__item--next a",
        ]);
        let styled = |name: &str, locator: Locator| Strategy {
            name: name.to_string(),
            locator,
            shape: ResponseShape::Markup {
                row_selectors: styled_rows.clone(),
                next_page_selectors: Vec::new(),
            },
            columns: ColumnMap::name_first(),
        };

        Self::new(vec![
            structured("rest-api", "/api/transparency-list"),
            structured("ingredients-api", "/api/ingredients"),
            structured("drupal-rest", "?_format=json"),
            structured("jsonapi", "/jsonapi/node/transparency_list"),
            Strategy {
                name: "views-table".to_string(),
                locator: Locator::Query {
                    param: "page".to_string(),
                    start: 0,
                    bare_first: true,
                },
                shape: ResponseShape::Markup {
                    row_selectors: styled_rows.clone(),
                    next_page_selectors: next_links,
                },
                columns: ColumnMap::name_first(),
            },
            Strategy {
                name: "bare-table".to_string(),
                locator: Locator::Query {
                    param: "page".to_string(),
                    start: 0,
                    bare_first: true,
                },
                shape: ResponseShape::Markup {
                    row_selectors: strings(&["table tr"]),
                    next_page_selectors: Vec::new(),
                },
                columns: ColumnMap::key_first(),
            },
            styled(
                "p-param",
                Locator::Query {
                    param: "p".to_string(),
                    start: 0,
                    bare_first: false,
                },
            ),
            styled(
                "path-page",
                Locator::Path {
                    prefix: "page".to_string(),
                    start: 1,
                },
            ),
            styled(
                "start-offset",
                Locator::Offset {
                    param: "start".to_string(),
                    page_size: 25,
                },
            ),
        ])
    }
}
