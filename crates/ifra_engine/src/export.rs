use std::io::Write;
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use ifra_core::{HarvestSummary, Ingredient};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub output_filename: String,
    /// Header used for the natural key column.
    pub key_column: String,
    pub summary_filename: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_filename: "ifra_ingredients.csv".to_string(),
            key_column: "cas_number".to_string(),
            summary_filename: Some("harvest_summary.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows_written: usize,
    pub output_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence collaborator that receives the final dataset.
pub trait IngredientSink {
    fn persist(
        &self,
        ingredients: &[Ingredient],
        summary: &HarvestSummary,
    ) -> Result<ExportSummary, ExportError>;
}

pub struct CsvExporter {
    output_dir: PathBuf,
    options: ExportOptions,
    generated_utc: Option<String>,
}

impl CsvExporter {
    pub fn new(output_dir: impl AsRef<Path>, options: ExportOptions) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            options,
            generated_utc: None,
        }
    }

    /// Timestamp recorded in the summary file.
    pub fn with_generated_utc(mut self, stamp: impl Into<String>) -> Self {
        self.generated_utc = Some(stamp.into());
        self
    }

    pub fn header(&self) -> [&str; 5] {
        [
            self.options.key_column.as_str(),
            "name",
            "category",
            "ifra_naturals_category",
            "description",
        ]
    }

    /// Header row followed by one row per ingredient, in the given order.
    pub fn write_csv<W: Write>(
        &self,
        out: W,
        ingredients: &[Ingredient],
    ) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(self.header())?;
        for ingredient in ingredients {
            writer.write_record([
                ingredient.natural_key(),
                ingredient.display_name(),
                ingredient.category().label(),
                ingredient.regulatory_category_code().unwrap_or_default(),
                ingredient.description(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl IngredientSink for CsvExporter {
    fn persist(
        &self,
        ingredients: &[Ingredient],
        summary: &HarvestSummary,
    ) -> Result<ExportSummary, ExportError> {
        let writer = AtomicFileWriter::new(&self.output_dir);
        let output_path = writer.write_with(&self.options.output_filename, |file| {
            self.write_csv(file, ingredients)
        })?;
        engine_info!("Wrote {} ingredients to {:?}", ingredients.len(), output_path);

        let summary_path = match &self.options.summary_filename {
            Some(name) => {
                let document = json!({
                    "generated_utc": self.generated_utc,
                    "output_file": self.options.output_filename,
                    "summary": summary,
                });
                let pretty = serde_json::to_string_pretty(&document)?;
                Some(writer.write(name, pretty.as_bytes())?)
            }
            None => None,
        };

        Ok(ExportSummary {
            rows_written: ingredients.len(),
            output_path,
            summary_path,
        })
    }
}
