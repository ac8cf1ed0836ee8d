//! Category reconciliation cross-tabulation.

use std::collections::BTreeMap;

use repro_model::ErrorCategory;

/// Categories as tabulated in the published comparison (success last;
/// timeouts and missing-object rows are reported but not part of the
/// repeat accounting).
pub const PAPER_CATEGORIES: [ErrorCategory; 6] = [
    ErrorCategory::Library,
    ErrorCategory::WorkingDirectory,
    ErrorCategory::MissingFile,
    ErrorCategory::Function,
    ErrorCategory::Other,
    ErrorCategory::Success,
];

/// Counts of (control category, treatment category) pairs over the
/// scripts present under both conditions. Absent cells, rows, and
/// columns read as zero.
#[derive(Debug, Clone, Default)]
pub struct CrossTab {
    counts: BTreeMap<(ErrorCategory, ErrorCategory), usize>,
}

impl CrossTab {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ErrorCategory, ErrorCategory)>) -> Self {
        let mut counts: BTreeMap<(ErrorCategory, ErrorCategory), usize> = BTreeMap::new();
        for pair in pairs {
            *counts.entry(pair).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, from: ErrorCategory, to: ErrorCategory) -> usize {
        self.counts.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Total scripts with the given control category that also appear
    /// in the treatment set.
    pub fn row_total(&self, from: ErrorCategory) -> usize {
        self.counts
            .iter()
            .filter(|((f, _), _)| *f == from)
            .map(|(_, count)| count)
            .sum()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Control categories with at least one pair, in a stable order.
    pub fn rows_present(&self) -> Vec<ErrorCategory> {
        let mut rows: Vec<ErrorCategory> = self.counts.keys().map(|(from, _)| *from).collect();
        rows.dedup();
        rows.sort_by_key(|category| display_rank(*category));
        rows.dedup();
        rows
    }

    /// Percentage of `from`-category scripts that moved to `to`;
    /// `None` when the row is empty.
    pub fn moved_percent(&self, from: ErrorCategory, to: ErrorCategory) -> Option<f64> {
        let total = self.row_total(from);
        (total > 0).then(|| self.count(from, to) as f64 / total as f64 * 100.0)
    }

    /// Percentage of `from`-category scripts that moved to any other
    /// category; `None` when the row is empty.
    pub fn not_repeated_percent(&self, from: ErrorCategory) -> Option<f64> {
        let total = self.row_total(from);
        (total > 0).then(|| {
            let repeated = self.count(from, from);
            (total - repeated) as f64 / total as f64 * 100.0
        })
    }

    /// Share of paired scripts that errored under the treatment whose
    /// error category differs from the control one, over the published
    /// category set.
    pub fn errors_not_repeated_percent(&self) -> Option<f64> {
        let mut total_errors = 0usize;
        for from in PAPER_CATEGORIES {
            for (&(f, to), count) in &self.counts {
                if f == from && to != ErrorCategory::Success {
                    total_errors += count;
                }
            }
        }
        let repeats: usize = PAPER_CATEGORIES
            .iter()
            .filter(|category| **category != ErrorCategory::Success)
            .map(|category| self.count(*category, *category))
            .sum();
        (total_errors > 0)
            .then(|| (total_errors - repeats) as f64 / total_errors as f64 * 100.0)
    }
}

fn display_rank(category: ErrorCategory) -> u8 {
    match category {
        ErrorCategory::Library => 0,
        ErrorCategory::WorkingDirectory => 1,
        ErrorCategory::MissingFile => 2,
        ErrorCategory::Function => 3,
        ErrorCategory::MissingObject => 4,
        ErrorCategory::Other => 5,
        ErrorCategory::TimedOut => 6,
        ErrorCategory::Success => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_model::ErrorCategory as Cat;

    fn sample() -> CrossTab {
        CrossTab::from_pairs([
            (Cat::Library, Cat::Success),
            (Cat::Library, Cat::Success),
            (Cat::Library, Cat::Library),
            (Cat::WorkingDirectory, Cat::Success),
            (Cat::Success, Cat::Function),
        ])
    }

    #[test]
    fn absent_cells_read_zero() {
        let tab = sample();
        assert_eq!(tab.count(Cat::TimedOut, Cat::Success), 0);
        assert_eq!(tab.count(Cat::Library, Cat::Function), 0);
        assert_eq!(tab.row_total(Cat::MissingFile), 0);
    }

    #[test]
    fn row_totals_sum_pairs() {
        let tab = sample();
        assert_eq!(tab.row_total(Cat::Library), 3);
        assert_eq!(tab.total(), 5);
    }

    #[test]
    fn moved_percent_over_row_total() {
        let tab = sample();
        let moved = tab.moved_percent(Cat::Library, Cat::Success).unwrap();
        assert!((moved - 66.666_666).abs() < 1e-3);
        assert_eq!(tab.moved_percent(Cat::MissingFile, Cat::Success), None);
    }

    #[test]
    fn not_repeated_percent() {
        let tab = sample();
        let moved = tab.not_repeated_percent(Cat::Library).unwrap();
        assert!((moved - 33.333_333).abs() < 1e-3);
        assert_eq!(tab.not_repeated_percent(Cat::Function), None);
    }

    #[test]
    fn errors_not_repeated_over_paper_categories() {
        // Treatment errors: library->library (repeat) and
        // success->function (new error).
        let tab = sample();
        let percent = tab.errors_not_repeated_percent().unwrap();
        assert!((percent - 50.0).abs() < 1e-9);
    }
}
