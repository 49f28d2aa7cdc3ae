use compact_str::CompactString;
use itertools::Itertools;
use rustc_hash::FxHashMap;

pub type Term = CompactString;

/// Placeholder the annotation tool writes when a row carries no terms.
pub const NO_ANNOTATION: &str = "-";

/// Split one comma-delimited cell into its terms.
///
/// The placeholder `-` and empty cells yield no terms; each term is trimmed
/// and empty fragments (stray commas) are dropped.
pub fn split_terms(cell: &str) -> impl Iterator<Item = &str> {
    let skip = cell.is_empty() || cell == NO_ANNOTATION;
    cell.split(',')
        .map(str::trim)
        .filter(move |term| !skip && !term.is_empty())
}

/// Occurrence counts of the terms of one multi-valued column across one
/// sample, first-seen order retained for deterministic tie-breaks.
#[derive(Debug, Default, Clone)]
pub struct TermCounts {
    counts: FxHashMap<Term, u64>,
    order: Vec<Term>,
}

impl TermCounts {
    pub fn tabulate<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = TermCounts::default();
        for cell in cells {
            for term in split_terms(cell.as_ref()) {
                match table.counts.get_mut(term) {
                    Some(count) => *count += 1,
                    None => {
                        let term = Term::new(term);
                        table.order.push(term.clone());
                        table.counts.insert(term, 1);
                    }
                }
            }
        }
        table
    }

    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Distinct terms with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, u64)> {
        self.order.iter().map(move |term| (term, self.counts[term]))
    }

    /// At most `n` terms, count descending; the sort is stable, so equal
    /// counts keep input encounter order.
    pub fn top_n(&self, n: usize) -> Vec<(Term, u64)> {
        self.iter()
            .map(|(term, count)| (term.clone(), count))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_counts_repeated_terms() {
        let counts = TermCounts::tabulate(["GO:1, GO:2,GO:1"]);

        assert_eq!(counts.get("GO:1"), 2);
        assert_eq!(counts.get("GO:2"), 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn placeholder_cell_contributes_no_terms() {
        let counts = TermCounts::tabulate([NO_ANNOTATION, "", "ko:K1"]);

        assert_eq!(counts.total(), 1);
        assert_eq!(counts.get("-"), 0);
        assert_eq!(counts.get("ko:K1"), 1);
    }

    #[test]
    fn stray_commas_yield_no_empty_terms() {
        let counts = TermCounts::tabulate(["map1,,map2, "]);

        assert_eq!(counts.total(), 2);
        assert_eq!(counts.get(""), 0);
    }

    #[test]
    fn top_n_is_bounded_sorted_and_tie_stable() {
        let counts = TermCounts::tabulate(["b,a,b,a,c,d,c"]);

        let top = counts.top_n(3);
        assert_eq!(
            top,
            vec![
                (Term::new("b"), 2),
                (Term::new("a"), 2),
                (Term::new("c"), 2),
            ]
        );
        assert!(counts.top_n(2).len() == 2);
    }

    #[test]
    fn empty_input_yields_empty_top_list() {
        let counts = TermCounts::tabulate(std::iter::empty::<&str>());

        assert!(counts.is_empty());
        assert!(counts.top_n(15).is_empty());
    }
}
