use std::path::{Path, PathBuf};

use clap::Parser;

use crate::data::model::DEFAULT_SOURCE_COLUMN;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone)]
#[command(name = "cord-explorer")]
#[command(about = "Explore CORD-19 research papers from the metadata dataset")]
pub struct Cli {
    /// Full metadata file (.csv or .json)
    #[arg(long, default_value = "metadata.csv")]
    pub source: PathBuf,

    /// Sample file written on first load and reused afterwards
    #[arg(long, default_value = "metadata_sample.csv")]
    pub sample: PathBuf,

    /// Maximum number of rows taken from the source
    #[arg(long, default_value_t = 10_000)]
    pub rows: usize,

    /// Column holding the source label
    #[arg(long, default_value = DEFAULT_SOURCE_COLUMN)]
    pub source_column: String,

    /// Rows shown in the preview table
    #[arg(long, default_value_t = 50)]
    pub preview_rows: usize,

    /// Entries in the journal and source charts
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Settings for one explorer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub source_path: PathBuf,
    pub sample_path: PathBuf,
    pub row_cap: usize,
    pub source_column: String,
    pub preview_rows: usize,
    pub top_k: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("metadata.csv"),
            sample_path: PathBuf::from("metadata_sample.csv"),
            row_cap: 10_000,
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
            preview_rows: 50,
            top_k: 10,
        }
    }
}

impl ExplorerConfig {
    /// Point at a new source with its own sample next to it, so a sample
    /// taken from another source is never reused.
    pub fn with_source(mut self, source_path: PathBuf) -> Self {
        self.sample_path = sample_path_for(&source_path);
        self.source_path = source_path;
        self
    }
}

/// `dir/name.ext` → `dir/name_sample.ext`.
pub fn sample_path_for(source_path: &Path) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source_path.extension() {
        Some(ext) => format!("{stem}_sample.{}", ext.to_string_lossy()),
        None => format!("{stem}_sample"),
    };
    source_path.with_file_name(file_name)
}

impl From<Cli> for ExplorerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            source_path: cli.source,
            sample_path: cli.sample,
            row_cap: cli.rows,
            source_column: cli.source_column,
            preview_rows: cli.preview_rows,
            top_k: cli.top_k,
        }
    }
}
