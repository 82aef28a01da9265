use std::collections::BTreeSet;

use super::model::{Paper, PaperTable};

/// Journal selector value meaning "no journal restriction".
pub const ALL_JOURNALS: &str = "All";

/// Bounds used when no row has a valid year.
pub const FALLBACK_YEAR_BOUNDS: YearBounds = YearBounds {
    min: 2019,
    max: 2022,
};

/// Range selected when a dataset is first shown, independent of its bounds.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2020, 2021);

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JournalFilter {
    #[default]
    All,
    Exact(String),
}

impl JournalFilter {
    /// Map a selector label to a filter; the "All" sentinel disables it.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_JOURNALS {
            JournalFilter::All
        } else {
            JournalFilter::Exact(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            JournalFilter::All => ALL_JOURNALS,
            JournalFilter::Exact(journal) => journal,
        }
    }

    fn matches(&self, journal: &str) -> bool {
        match self {
            JournalFilter::All => true,
            JournalFilter::Exact(wanted) => wanted == journal,
        }
    }
}

/// Sidebar selections: inclusive year range and journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub year_min: i32,
    pub year_max: i32,
    pub journal: JournalFilter,
}

impl FilterState {
    /// Selections shown for a freshly loaded dataset.
    pub fn initial() -> Self {
        FilterState {
            year_min: DEFAULT_YEAR_RANGE.0,
            year_max: DEFAULT_YEAR_RANGE.1,
            journal: JournalFilter::All,
        }
    }

    /// A paper passes when it has a year inside the range and matches the
    /// journal selection.
    pub fn matches(&self, paper: &Paper) -> bool {
        let in_range = paper
            .year
            .is_some_and(|y| self.year_min <= y && y <= self.year_max);
        in_range && self.journal.matches(&paper.journal)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Return indices of papers that pass the filter, in table order.
pub fn filtered_indices(table: &PaperTable, filters: &FilterState) -> Vec<usize> {
    table
        .papers
        .iter()
        .enumerate()
        .filter(|(_, paper)| filters.matches(paper))
        .map(|(i, _)| i)
        .collect()
}

/// Derive the filtered view as its own table.
pub fn filter_table(table: &PaperTable, filters: &FilterState) -> PaperTable {
    let papers = filtered_indices(table, filters)
        .into_iter()
        .map(|i| table.papers[i].clone())
        .collect();
    table.with_papers(papers)
}

// ---------------------------------------------------------------------------
// Selector contents
// ---------------------------------------------------------------------------

/// Slider limits for the year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

/// Smallest and largest observed year, each falling back independently to
/// [`FALLBACK_YEAR_BOUNDS`] when the table has no valid year.
pub fn year_bounds(table: &PaperTable) -> YearBounds {
    let years = table.papers.iter().filter_map(|p| p.year);
    YearBounds {
        min: years.clone().min().unwrap_or(FALLBACK_YEAR_BOUNDS.min),
        max: years.max().unwrap_or(FALLBACK_YEAR_BOUNDS.max),
    }
}

/// "All" followed by every distinct journal in sorted order.
pub fn journal_options(table: &PaperTable) -> Vec<String> {
    let unique: BTreeSet<&str> = table.papers.iter().map(|p| p.journal.as_str()).collect();
    std::iter::once(ALL_JOURNALS.to_string())
        .chain(unique.into_iter().map(String::from))
        .collect()
}
