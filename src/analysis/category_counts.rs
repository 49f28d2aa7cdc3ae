use compact_str::CompactString;
use itertools::Itertools;
use rustc_hash::FxHashMap;

pub type Category = CompactString;

/// Occurrence counts of one sample's category column.
///
/// First-seen order is retained so that equal counts rank deterministically:
/// `top_n` sorts by count descending with a stable sort, so ties keep input
/// encounter order.
#[derive(Debug, Default, Clone)]
pub struct CategoryCounts {
    counts: FxHashMap<Category, u64>,
    order: Vec<Category>,
}

impl CategoryCounts {
    /// Count occurrences of each distinct non-empty cell.
    ///
    /// An empty cell means the row carries no assignment and contributes
    /// nothing; the placeholder `-` is a value like any other here.
    pub fn tabulate<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = CategoryCounts::default();
        for cell in cells {
            let cell = cell.as_ref();
            if cell.is_empty() {
                continue;
            }
            match table.counts.get_mut(cell) {
                Some(count) => *count += 1,
                None => {
                    let category = Category::new(cell);
                    table.order.push(category.clone());
                    table.counts.insert(category, 1);
                }
            }
        }
        table
    }

    pub fn get(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum over all categories, i.e. the number of counted cells.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Distinct categories with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.order.iter().map(move |category| (category, self.counts[category]))
    }

    /// At most `n` categories, count descending, ties in first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(Category, u64)> {
        self.iter()
            .map(|(category, count)| (category.clone(), count))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .collect()
    }
}

/// Category x sample count matrix merged from per-sample tabulations.
///
/// Sample (column) order is insertion order, category (row) order is
/// first-seen order across the merge. Absent (category, sample) pairs are
/// zero.
#[derive(Debug, Default, Clone)]
pub struct SampleCountTable {
    samples: Vec<String>,
    order: Vec<Category>,
    rows: FxHashMap<Category, Vec<u64>>,
}

impl SampleCountTable {
    pub fn new() -> Self {
        SampleCountTable::default()
    }

    /// Append one sample column, zero-filling on both sides of the merge.
    pub fn insert_sample(&mut self, sample: impl Into<String>, counts: &CategoryCounts) {
        self.samples.push(sample.into());
        let width = self.samples.len();

        for row in self.rows.values_mut() {
            row.push(0);
        }

        for (category, count) in counts.iter() {
            match self.rows.get_mut(category) {
                Some(row) => row[width - 1] = count,
                None => {
                    let mut row = vec![0; width];
                    row[width - 1] = count;
                    self.order.push(category.clone());
                    self.rows.insert(category.clone(), row);
                }
            }
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Categories in first-seen order across all merged samples.
    pub fn categories(&self) -> &[Category] {
        &self.order
    }

    pub fn get(&self, category: &str, sample: &str) -> u64 {
        let index = match self.samples.iter().position(|s| s == sample) {
            Some(index) => index,
            None => return 0,
        };
        self.rows.get(category).map(|row| row[index]).unwrap_or(0)
    }

    /// Per-sample counts of one category, in sample order.
    pub fn row(&self, category: &str) -> Option<&[u64]> {
        self.rows.get(category).map(Vec::as_slice)
    }

    /// Total count of one category summed across samples.
    pub fn category_total(&self, category: &str) -> u64 {
        self.rows
            .get(category)
            .map(|row| row.iter().sum())
            .unwrap_or(0)
    }

    /// Column sums, in sample order.
    pub fn sample_totals(&self) -> Vec<u64> {
        let mut totals = vec![0; self.samples.len()];
        for row in self.rows.values() {
            for (total, count) in totals.iter_mut().zip(row) {
                *total += count;
            }
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// At most `n` categories ranked by total count across samples,
    /// descending, ties in first-seen order.
    pub fn top_categories(&self, n: usize) -> Vec<Category> {
        self.order
            .iter()
            .map(|category| (category.clone(), self.category_total(category)))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .map(|(category, _)| category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_distinct_values_and_skips_empty_cells() {
        let counts = CategoryCounts::tabulate(["C", "K", "C", "", "-", "C"]);

        assert_eq!(counts.get("C"), 3);
        assert_eq!(counts.get("K"), 1);
        assert_eq!(counts.get("-"), 1);
        assert_eq!(counts.get(""), 0);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn column_sum_equals_number_of_counted_cells() {
        let cells = ["C", "K", "", "E", "C", "", "EGP"];
        let counts = CategoryCounts::tabulate(cells);

        let non_missing = cells.iter().filter(|c| !c.is_empty()).count() as u64;
        assert_eq!(counts.total(), non_missing);
    }

    #[test]
    fn empty_input_yields_empty_counts() {
        let counts = CategoryCounts::tabulate(std::iter::empty::<&str>());

        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert!(counts.top_n(10).is_empty());
    }

    #[test]
    fn top_n_breaks_ties_by_first_seen_order() {
        let counts = CategoryCounts::tabulate(["K", "C", "K", "C", "E"]);

        let top = counts.top_n(2);
        assert_eq!(top, vec![(Category::new("K"), 2), (Category::new("C"), 2)]);
    }

    #[test]
    fn merged_table_zero_fills_absent_pairs() {
        let sample_a = CategoryCounts::tabulate(["C", "C", "C", "K", "K"]);
        let sample_b = CategoryCounts::tabulate(["C"]);

        let mut table = SampleCountTable::new();
        table.insert_sample("A", &sample_a);
        table.insert_sample("B", &sample_b);

        assert_eq!(table.get("C", "A"), 3);
        assert_eq!(table.get("C", "B"), 1);
        assert_eq!(table.get("K", "A"), 2);
        assert_eq!(table.get("K", "B"), 0);
        assert_eq!(table.get("Z", "A"), 0);
        assert_eq!(table.sample_totals(), vec![5, 1]);
    }

    #[test]
    fn categories_first_seen_in_a_later_sample_backfill_zeros() {
        let mut table = SampleCountTable::new();
        table.insert_sample("A", &CategoryCounts::tabulate(["C"]));
        table.insert_sample("B", &CategoryCounts::tabulate(["K", "K"]));

        assert_eq!(table.row("K"), Some(&[0, 2][..]));
        assert_eq!(table.categories(), &[Category::new("C"), Category::new("K")]);
    }

    #[test]
    fn top_categories_rank_by_total_across_samples() {
        let mut table = SampleCountTable::new();
        table.insert_sample("A", &CategoryCounts::tabulate(["C", "C", "K"]));
        table.insert_sample("B", &CategoryCounts::tabulate(["K", "K", "E"]));

        let top = table.top_categories(2);
        assert_eq!(top, vec![Category::new("K"), Category::new("C")]);
    }
}
