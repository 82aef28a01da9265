use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TITLE: &str = "title";
pub const AUTHORS: &str = "authors";
pub const JOURNAL: &str = "journal";
pub const PUBLISH_TIME: &str = "publish_time";
pub const ABSTRACT: &str = "abstract";

/// Column carrying the source label in CORD-19 `metadata.csv` releases.
pub const DEFAULT_SOURCE_COLUMN: &str = "source_x";

// ---------------------------------------------------------------------------
// RawRecord – one row as read from disk
// ---------------------------------------------------------------------------

/// A metadata row before cleaning. Every cell is nullable; empty cells and
/// the usual NA markers are read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub publish_time: Option<String>,
    pub abstract_text: Option<String>,
    pub source: Option<String>,
}

/// Rows in file order plus the header they were read with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header of the file, in file order.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
    /// Whether the source-label column was present in the header.
    pub has_source: bool,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Paper – one cleaned row
// ---------------------------------------------------------------------------

/// A cleaned metadata entry. Defaults have been filled in and the derived
/// fields computed, so only `authors`, `publish_time`, `year` and `source`
/// can still be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    pub authors: Option<String>,
    pub journal: String,
    pub publish_time: Option<NaiveDate>,
    pub abstract_text: String,
    pub source: Option<String>,
    /// Calendar year of `publish_time`; `None` exactly when it is.
    pub year: Option<i32>,
    pub abstract_word_count: usize,
}

// ---------------------------------------------------------------------------
// PaperTable – the cleaned dataset
// ---------------------------------------------------------------------------

/// Cleaned papers in file order. Treated as immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperTable {
    pub papers: Vec<Paper>,
    /// Carried over from [`RawTable::has_source`]; gates the source breakdown.
    pub has_source: bool,
}

impl PaperTable {
    /// Number of papers.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Build a table over a subset of rows, keeping the schema flags.
    pub fn with_papers(&self, papers: Vec<Paper>) -> Self {
        PaperTable {
            papers,
            has_source: self.has_source,
        }
    }
}
