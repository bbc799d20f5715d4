use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed set of catalog categories an ingredient can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Synthetic")]
    Synthetic,
    #[serde(rename = "Natural Extracts")]
    NaturalExtracts,
    #[serde(rename = "Citrus Oils")]
    CitrusOils,
    #[serde(rename = "Leaf Oils")]
    LeafOils,
    #[serde(rename = "Balsam Oils")]
    BalsamOils,
    #[serde(rename = "Seed Oils")]
    SeedOils,
    #[serde(rename = "Vegetable Oils")]
    VegetableOils,
    #[serde(rename = "Natural Oils")]
    NaturalOils,
    #[serde(rename = "Essential Oils")]
    EssentialOils,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Synthetic,
        Category::NaturalExtracts,
        Category::CitrusOils,
        Category::LeafOils,
        Category::BalsamOils,
        Category::SeedOils,
        Category::VegetableOils,
        Category::NaturalOils,
        Category::EssentialOils,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Synthetic => "Synthetic",
            Category::NaturalExtracts => "Natural Extracts",
            Category::CitrusOils => "Citrus Oils",
            Category::LeafOils => "Leaf Oils",
            Category::BalsamOils => "Balsam Oils",
            Category::SeedOils => "Seed Oils",
            Category::VegetableOils => "Vegetable Oils",
            Category::NaturalOils => "Natural Oils",
            Category::EssentialOils => "Essential Oils",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
