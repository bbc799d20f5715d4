//! Rule-table classification and description enrichment.
//!
//! Rules are evaluated in table order and the first match wins. Category
//! hints always take precedence over name keywords, which take precedence
//! over the default.

use crate::{Category, Ingredient, RecordFields};

pub const DEFAULT_DESCRIPTION: &str = "Fragrance ingredient approved by IFRA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintRule {
    pub prefix: char,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionRule {
    Category {
        category: Category,
        text: &'static str,
    },
    Keyword {
        keywords: &'static [&'static str],
        text: &'static str,
    },
}

#[rustfmt::skip]
pub const HINT_RULES: &[HintRule] = &[
    HintRule { prefix: 'G', category: Category::CitrusOils },
    HintRule { prefix: 'J', category: Category::LeafOils },
    HintRule { prefix: 'K', category: Category::BalsamOils },
    HintRule { prefix: 'H', category: Category::SeedOils },
    HintRule { prefix: 'F', category: Category::VegetableOils },
];

/// Category for a non-empty hint that matches no prefix.
pub const UNMATCHED_HINT: Category = Category::NaturalExtracts;

#[rustfmt::skip]
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule { keywords: &["oil"], category: Category::NaturalOils },
    KeywordRule { keywords: &["extract", "absolute"], category: Category::NaturalExtracts },
    KeywordRule { keywords: &["essence", "essential"], category: Category::EssentialOils },
];

#[rustfmt::skip]
pub const DESCRIPTION_RULES: &[DescriptionRule] = &[
    DescriptionRule::Category { category: Category::CitrusOils, text: "Fresh citrus note" },
    DescriptionRule::Category { category: Category::LeafOils, text: "Aromatic leaf extract" },
    DescriptionRule::Category { category: Category::BalsamOils, text: "Warm balsamic note" },
    DescriptionRule::Keyword { keywords: &["vanilla", "vanillin"], text: "Sweet vanilla note" },
    DescriptionRule::Keyword { keywords: &["lemon", "citral"], text: "Fresh lemon citrus note" },
    DescriptionRule::Keyword { keywords: &["rose", "geraniol"], text: "Rosy floral note" },
    DescriptionRule::Keyword { keywords: &["musk"], text: "Clean musk note" },
    DescriptionRule::Keyword { keywords: &["wood", "cedar"], text: "Woody note" },
    DescriptionRule::Keyword { keywords: &["floral", "flower"], text: "Floral note" },
];

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    hints: &'static [HintRule],
    keywords: &'static [KeywordRule],
    descriptions: &'static [DescriptionRule],
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            hints: HINT_RULES,
            keywords: KEYWORD_RULES,
            descriptions: DESCRIPTION_RULES,
        }
    }
}

impl Classifier {
    pub fn classify(&self, name: &str, hint: Option<&str>) -> Category {
        if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
            return self
                .hints
                .iter()
                .find(|rule| hint.starts_with(rule.prefix))
                .map(|rule| rule.category)
                .unwrap_or(UNMATCHED_HINT);
        }

        let lowered = name.to_lowercase();
        self.keywords
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
            .map(|rule| rule.category)
            .unwrap_or(Category::Synthetic)
    }

    /// Synthesized description used when the source supplied none.
    pub fn describe(&self, name: &str, category: Category) -> &'static str {
        let lowered = name.to_lowercase();
        self.descriptions
            .iter()
            .find_map(|rule| match *rule {
                DescriptionRule::Category { category: c, text } if c == category => Some(text),
                DescriptionRule::Keyword { keywords, text }
                    if keywords.iter().any(|k| lowered.contains(k)) =>
                {
                    Some(text)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Classify and enrich projected fields into an [`Ingredient`].
    pub fn ingredient(&self, fields: RecordFields) -> Option<Ingredient> {
        let category = self.classify(&fields.display_name, fields.code.as_deref());
        let description = match fields.description {
            Some(text) => text,
            None => self.describe(&fields.display_name, category).to_string(),
        };
        Ingredient::new(
            fields.natural_key,
            fields.display_name,
            fields.code,
            category,
            description,
        )
    }
}
