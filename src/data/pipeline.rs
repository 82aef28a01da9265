use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ExplorerConfig;

use super::clean::clean;
use super::filter::{year_bounds, YearBounds};
use super::loader::{load_sample, LoadError};
use super::model::PaperTable;

// ---------------------------------------------------------------------------
// Dataset – a loaded and cleaned table
// ---------------------------------------------------------------------------

/// The cleaned table for one (source, row cap) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub table: PaperTable,
    pub bounds: YearBounds,
    /// Set when the source file was missing; the table is then empty.
    pub notice: Option<String>,
}

impl Dataset {
    fn new(table: PaperTable, notice: Option<String>) -> Self {
        Dataset {
            bounds: year_bounds(&table),
            table,
            notice,
        }
    }
}

/// Load and clean. A missing source becomes an empty dataset with a notice;
/// every other error is returned.
pub fn prepare(config: &ExplorerConfig) -> Result<Dataset, LoadError> {
    match load_sample(
        &config.sample_path,
        &config.source_path,
        config.row_cap,
        &config.source_column,
    ) {
        Ok(raw) => {
            if raw.is_empty() {
                log::warn!("No rows read; columns were {:?}", raw.columns);
            }
            Ok(Dataset::new(clean(&raw), None))
        }
        Err(err @ LoadError::MissingSourceFile { .. }) => {
            log::warn!("{err}");
            Ok(Dataset::new(PaperTable::default(), Some(err.to_string())))
        }
        Err(err) => Err(err),
    }
}

// ---------------------------------------------------------------------------
// DatasetMemo – caller-owned load cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub source_path: PathBuf,
    pub row_cap: usize,
}

impl MemoKey {
    pub fn of(config: &ExplorerConfig) -> Self {
        MemoKey {
            source_path: config.source_path.clone(),
            row_cap: config.row_cap,
        }
    }
}

/// Prepared datasets keyed by source path and row cap.
#[derive(Debug, Default)]
pub struct DatasetMemo {
    entries: HashMap<MemoKey, Arc<Dataset>>,
}

impl DatasetMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoised dataset for `config`, preparing it on first use.
    /// Failed preparations are not memoised.
    pub fn get_or_prepare(&mut self, config: &ExplorerConfig) -> Result<Arc<Dataset>, LoadError> {
        let key = MemoKey::of(config);
        if let Some(dataset) = self.entries.get(&key) {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(prepare(config)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Forget one entry so the next request loads again.
    pub fn invalidate(&mut self, key: &MemoKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
