use std::collections::{HashMap, HashSet};

use crate::{Category, Ingredient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Inserted,
    /// A record with the same natural key was already present.
    DuplicateKey,
    /// Keyless record whose name was already seen among keyless records.
    DuplicateName,
}

/// Accumulator for one harvest run. Insertion order is preserved and the
/// first record seen for a key wins.
#[derive(Debug, Default)]
pub struct HarvestState {
    records: Vec<Ingredient>,
    by_key: HashMap<String, usize>,
    keyless_names: HashSet<String>,
    raw_rows: usize,
    malformed: usize,
    duplicates: usize,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_raw_row(&mut self) {
        self.raw_rows += 1;
    }

    pub fn note_malformed(&mut self, rows: usize) {
        self.malformed += rows;
    }

    pub fn fold(&mut self, ingredient: Ingredient) -> FoldOutcome {
        if ingredient.has_key() {
            if self.by_key.contains_key(ingredient.natural_key()) {
                self.duplicates += 1;
                return FoldOutcome::DuplicateKey;
            }
            self.by_key
                .insert(ingredient.natural_key().to_string(), self.records.len());
        } else if !self
            .keyless_names
            .insert(ingredient.display_name().to_lowercase())
        {
            self.duplicates += 1;
            return FoldOutcome::DuplicateName;
        }
        self.records.push(ingredient);
        FoldOutcome::Inserted
    }

    pub fn get(&self, natural_key: &str) -> Option<&Ingredient> {
        self.by_key.get(natural_key).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[Ingredient] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn raw_rows(&self) -> usize {
        self.raw_rows
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.records
            .iter()
            .filter(|r| r.category() == category)
            .count()
    }

    pub fn into_records(self) -> Vec<Ingredient> {
        self.records
    }
}
