use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Category;

/// IFRA Naturals code shape, e.g. `A2.15` or `G2.20`.
static NCS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d+\.\d+").expect("static regex"));

/// CAS registry number shape, e.g. `8007-75-8`.
static CAS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,7}-\d{2}-\d$").expect("static regex"));

/// Trim and collapse internal whitespace runs to a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_ncs_code(text: &str) -> bool {
    NCS_CODE.is_match(text)
}

pub fn is_cas_number(text: &str) -> bool {
    CAS_NUMBER.is_match(text.trim())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub page: u32,
    pub strategy: String,
}

/// One extracted row, cells already cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub cells: Vec<String>,
    pub provenance: Provenance,
}

impl RawRecord {
    pub fn new(cells: Vec<String>, provenance: Provenance) -> Self {
        Self { cells, provenance }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePolicy {
    /// Any non-empty text in the code column is accepted.
    #[default]
    Any,
    /// Only text shaped like an NCS code is accepted; anything else counts as absent.
    NcsPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    #[default]
    Any,
    /// The key column must mostly hold CAS numbers for the layout to fit a page.
    CasPattern,
}

/// Cell positions for one source layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub name: usize,
    #[serde(default)]
    pub key: Option<usize>,
    #[serde(default)]
    pub code: Option<usize>,
    #[serde(default)]
    pub description: Option<usize>,
    #[serde(default)]
    pub code_policy: CodePolicy,
    #[serde(default)]
    pub key_policy: KeyPolicy,
}

impl ColumnMap {
    /// `name | cas | ncs | description`, the styled listing layout.
    pub const fn name_first() -> Self {
        Self {
            name: 0,
            key: Some(1),
            code: Some(2),
            description: Some(3),
            code_policy: CodePolicy::NcsPattern,
            key_policy: KeyPolicy::CasPattern,
        }
    }

    /// `cas | name | ncs`, the bare table layout.
    pub const fn key_first() -> Self {
        Self {
            name: 1,
            key: Some(0),
            code: Some(2),
            description: None,
            code_policy: CodePolicy::Any,
            key_policy: KeyPolicy::CasPattern,
        }
    }

    /// `key | name | code | description`, the order structured records are flattened into.
    pub const fn canonical() -> Self {
        Self {
            name: 1,
            key: Some(0),
            code: Some(2),
            description: Some(3),
            code_policy: CodePolicy::Any,
            key_policy: KeyPolicy::Any,
        }
    }

    /// Whether this layout plausibly describes `records`, all taken from one page.
    ///
    /// Under [`KeyPolicy::CasPattern`] at least half of the non-empty key cells
    /// must be CAS numbers. A page without any key cells always fits.
    pub fn layout_fits(&self, records: &[RawRecord]) -> bool {
        if self.key_policy == KeyPolicy::Any {
            return true;
        }
        let keys: Vec<&str> = records
            .iter()
            .filter_map(|r| self.key.and_then(|i| r.cell(i)))
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        let matching = keys.iter().filter(|k| is_cas_number(k)).count();
        matching * 2 >= keys.len()
    }

    pub fn name_of<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        record
            .cell(self.name)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Map cells to fields. `None` when the row has no usable name.
    pub fn project(&self, record: &RawRecord) -> Option<RecordFields> {
        let display_name = clean_text(self.name_of(record)?);
        let natural_key = self
            .key
            .and_then(|i| record.cell(i))
            .map(clean_text)
            .unwrap_or_default();
        let code = self
            .code
            .and_then(|i| record.cell(i))
            .map(clean_text)
            .filter(|c| !c.is_empty())
            .filter(|c| match self.code_policy {
                CodePolicy::Any => true,
                CodePolicy::NcsPattern => is_ncs_code(c),
            });
        let description = self
            .description
            .and_then(|i| record.cell(i))
            .map(clean_text)
            .filter(|d| !d.is_empty());

        Some(RecordFields {
            natural_key,
            display_name,
            code,
            description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub natural_key: String,
    pub display_name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    natural_key: String,
    display_name: String,
    regulatory_category_code: Option<String>,
    category: Category,
    description: String,
}

impl Ingredient {
    /// Returns `None` if `display_name` is empty after trimming.
    pub fn new(
        natural_key: impl Into<String>,
        display_name: impl Into<String>,
        regulatory_category_code: Option<String>,
        category: Category,
        description: impl Into<String>,
    ) -> Option<Self> {
        let display_name = clean_text(&display_name.into());
        if display_name.is_empty() {
            return None;
        }
        Some(Self {
            natural_key: natural_key.into().trim().to_string(),
            display_name,
            regulatory_category_code: regulatory_category_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            category,
            description: description.into(),
        })
    }

    pub fn natural_key(&self) -> &str {
        &self.natural_key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn regulatory_category_code(&self) -> Option<&str> {
        self.regulatory_category_code.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_key(&self) -> bool {
        !self.natural_key.is_empty()
    }
}
