use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ExplorerConfig;
use crate::data::aggregate::Summary;
use crate::data::filter::{filter_table, journal_options, FilterState, JournalFilter};
use crate::data::model::PaperTable;
use crate::data::pipeline::{Dataset, DatasetMemo, MemoKey};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ExplorerConfig,

    /// Loaded datasets, keyed by source path and row cap.
    memo: DatasetMemo,

    /// Dataset currently shown (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Sidebar selections.
    pub filters: FilterState,

    /// Journal selector entries, "All" first.
    pub journal_options: Vec<String>,

    /// Rows passing the current filters (cached).
    pub filtered: PaperTable,

    /// Chart inputs for `filtered`; None when it is empty.
    pub summary: Option<Summary>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            memo: DatasetMemo::new(),
            dataset: None,
            filters: FilterState::initial(),
            journal_options: Vec::new(),
            filtered: PaperTable::default(),
            summary: None,
            status_message: None,
        }
    }

    /// Load (or fetch from the memo) the dataset for the current config.
    pub fn load(&mut self) {
        let result = self.memo.get_or_prepare(&self.config);
        log::debug!("{} datasets memoised", self.memo.len());
        match result {
            Ok(dataset) => {
                log::info!(
                    "Dataset ready: {} papers, years {}..={}",
                    dataset.table.len(),
                    dataset.bounds.min,
                    dataset.bounds.max
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the memoised dataset for the current config and load again.
    pub fn reload(&mut self) {
        self.memo.invalidate(&MemoKey::of(&self.config));
        self.load();
    }

    /// Point at a different source file and load it.
    pub fn open_source(&mut self, path: PathBuf) {
        self.config = self.config.clone().with_source(path);
        self.load();
    }

    /// Ingest a dataset, reset filters and recompute the views.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = FilterState::initial();
        self.journal_options = journal_options(&dataset.table);
        self.status_message = dataset.notice.clone();
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute the filtered table and summary after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.filtered = filter_table(&ds.table, &self.filters);
        self.summary = Summary::compute(&self.filtered, self.config.top_k);
        log::debug!(
            "Filter {}..={} / {}: {} of {} papers",
            self.filters.year_min,
            self.filters.year_max,
            self.filters.journal.label(),
            self.filtered.len(),
            ds.table.len()
        );
    }

    /// Set the year range, keeping min ≤ max.
    pub fn set_year_range(&mut self, year_min: i32, year_max: i32) {
        let (lo, hi) = if year_min <= year_max {
            (year_min, year_max)
        } else {
            (year_max, year_min)
        };
        if (lo, hi) != (self.filters.year_min, self.filters.year_max) {
            self.filters.year_min = lo;
            self.filters.year_max = hi;
            self.refilter();
        }
    }

    /// Select a journal by its selector label ("All" clears the filter).
    pub fn select_journal(&mut self, label: &str) {
        let journal = JournalFilter::from_label(label);
        if journal != self.filters.journal {
            self.filters.journal = journal;
            self.refilter();
        }
    }

    /// Whether a non-empty dataset is loaded.
    pub fn has_data(&self) -> bool {
        self.dataset.as_ref().is_some_and(|ds| !ds.table.is_empty())
    }
}
