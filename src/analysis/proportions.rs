use rustc_hash::FxHashMap;

use crate::analysis::category_counts::{Category, SampleCountTable};

/// Column-normalized view of a `SampleCountTable`.
///
/// Proportions are computed over all categories, so each sample column sums
/// to 1.0 when the sample has any counts, and is all zero otherwise (a zero
/// total never divides). Restricting to the top-N categories happens after
/// normalization, so a restricted column may sum to less than 1.
#[derive(Debug, Default, Clone)]
pub struct ProportionTable {
    samples: Vec<String>,
    order: Vec<Category>,
    rows: FxHashMap<Category, Vec<f64>>,
}

impl ProportionTable {
    pub fn from_counts(table: &SampleCountTable) -> Self {
        let totals = table.sample_totals();
        let mut rows = FxHashMap::default();

        for category in table.categories() {
            if let Some(counts) = table.row(category) {
                let proportions = counts
                    .iter()
                    .zip(&totals)
                    .map(|(&count, &total)| {
                        if total == 0 {
                            0.0
                        } else {
                            count as f64 / total as f64
                        }
                    })
                    .collect();
                rows.insert(category.clone(), proportions);
            }
        }

        ProportionTable {
            samples: table.samples().to_vec(),
            order: table.categories().to_vec(),
            rows,
        }
    }

    /// Keep only the given categories, in the given (rank) order.
    pub fn restrict_to(&self, categories: &[Category]) -> ProportionTable {
        let order: Vec<Category> = categories
            .iter()
            .filter(|category| self.rows.contains_key(*category))
            .cloned()
            .collect();
        let rows = order
            .iter()
            .filter_map(|category| {
                self.rows
                    .get(category)
                    .map(|row| (category.clone(), row.clone()))
            })
            .collect();

        ProportionTable {
            samples: self.samples.clone(),
            order,
            rows,
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn categories(&self) -> &[Category] {
        &self.order
    }

    /// Per-sample proportions of one category, in sample order.
    pub fn row(&self, category: &str) -> Option<&[f64]> {
        self.rows.get(category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
