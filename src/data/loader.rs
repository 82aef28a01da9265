use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{RawRecord, RawTable, ABSTRACT, AUTHORS, JOURNAL, PUBLISH_TIME, TITLE};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither a sample nor the source file exists. Recoverable.
    #[error("File '{}' not found. Place it next to the application or pass --source.", path.display())]
    MissingSourceFile { path: PathBuf },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    fn parse(path: &Path, reason: impl ToString) -> Self {
        LoadError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Cell values read as missing, matching what pandas treats as NaN.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn cell(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !NA_MARKERS.contains(&v) => Some(v.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load at most `row_cap` rows, reusing a previously written sample.
///
/// * `sample_path` exists → it is read verbatim, whatever `row_cap` is now.
/// * `source_path` is missing → [`LoadError::MissingSourceFile`].
/// * otherwise the first `row_cap` rows of `source_path` are written to
///   `sample_path` and returned.
///
/// Both files are dispatched by extension (`.csv` or `.json`).
pub fn load_sample(
    sample_path: &Path,
    source_path: &Path,
    row_cap: usize,
    source_column: &str,
) -> Result<RawTable, LoadError> {
    if sample_path.exists() {
        log::info!("Reusing sample {}", sample_path.display());
        return read_file(sample_path, None, source_column).map(|(table, _)| table);
    }

    if !source_path.exists() {
        return Err(LoadError::MissingSourceFile {
            path: source_path.to_path_buf(),
        });
    }

    let (table, rows) = read_file(source_path, Some(row_cap), source_column)?;
    write_sample(sample_path, rows)?;
    log::info!(
        "Sampled {} rows from {} into {}",
        table.len(),
        source_path.display(),
        sample_path.display()
    );
    Ok(table)
}

/// The rows as read, kept so the sample can be written in the source layout.
enum SampleRows {
    Csv {
        headers: csv::StringRecord,
        rows: Vec<csv::StringRecord>,
    },
    Json(Vec<JsonValue>),
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn read_file(
    path: &Path,
    cap: Option<usize>,
    source_column: &str,
) -> Result<(RawTable, SampleRows), LoadError> {
    match extension(path).as_str() {
        "csv" => read_csv(path, cap, source_column),
        "json" => read_json(path, cap, source_column),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn write_sample(path: &Path, rows: SampleRows) -> Result<(), LoadError> {
    let wanted = match rows {
        SampleRows::Csv { .. } => "csv",
        SampleRows::Json(_) => "json",
    };
    if extension(path) != wanted {
        return Err(LoadError::UnsupportedFormat(extension(path)));
    }

    write_via_partial(path, |out| match &rows {
        SampleRows::Csv { headers, rows } => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(headers).map_err(|e| csv_error(path, e))?;
            for row in rows {
                writer.write_record(row).map_err(|e| csv_error(path, e))?;
            }
            writer.flush().map_err(|e| LoadError::io(path, e))
        }
        SampleRows::Json(rows) => {
            serde_json::to_writer(&mut *out, rows).map_err(|e| LoadError::parse(path, e))?;
            out.flush().map_err(|e| LoadError::io(path, e))
        }
    })
}

/// `dir/name` → `dir/name.partial`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write into a sibling `.partial` file and rename it over `path` once
/// complete, so `path` only ever holds a finished sample.
fn write_via_partial<F>(path: &Path, write: F) -> Result<(), LoadError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LoadError>,
{
    let partial = partial_path(path);
    let result = File::create(&partial)
        .map_err(|e| LoadError::io(&partial, e))
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.into_inner()
                .map_err(|e| LoadError::io(&partial, e.into_error()))?
                .sync_all()
                .map_err(|e| LoadError::io(&partial, e))
        })
        .and_then(|()| std::fs::rename(&partial, path).map_err(|e| LoadError::io(path, e)));

    if result.is_err() && partial.exists() {
        if let Err(e) = std::fs::remove_file(&partial) {
            log::warn!("Could not remove {}: {e}", partial.display());
        }
    }
    result
}

fn csv_error(path: &Path, err: csv::Error) -> LoadError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => LoadError::io(path, io),
            other => LoadError::parse(path, format!("{other:?}")),
        }
    } else {
        LoadError::parse(path, err)
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Positions of the known columns in a header row.
struct ColumnIndex {
    title: Option<usize>,
    authors: Option<usize>,
    journal: Option<usize>,
    publish_time: Option<usize>,
    abstract_text: Option<usize>,
    source: Option<usize>,
}

impl ColumnIndex {
    fn new(headers: &[String], source_column: &str) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        ColumnIndex {
            title: find(TITLE),
            authors: find(AUTHORS),
            journal: find(JOURNAL),
            publish_time: find(PUBLISH_TIME),
            abstract_text: find(ABSTRACT),
            source: find(source_column),
        }
    }

    fn record(&self, row: &csv::StringRecord) -> RawRecord {
        let get = |idx: Option<usize>| cell(idx.and_then(|i| row.get(i)));
        RawRecord {
            title: get(self.title),
            authors: get(self.authors),
            journal: get(self.journal),
            publish_time: get(self.publish_time),
            abstract_text: get(self.abstract_text),
            source: get(self.source),
        }
    }
}

/// Header row followed by records. Short rows are padded with missing cells;
/// a row longer than the header is a parse failure.
fn read_csv(
    path: &Path,
    cap: Option<usize>,
    source_column: &str,
) -> Result<(RawTable, SampleRows), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::new(&columns, source_column);

    let mut rows = Vec::new();
    let mut records = Vec::new();
    for result in reader.records().take(cap.unwrap_or(usize::MAX)) {
        let mut row = result.map_err(|e| csv_error(path, e))?;
        if row.len() > headers.len() {
            let line = row.position().map_or(0, |p| p.line());
            return Err(LoadError::parse(
                path,
                format!(
                    "line {line}: expected at most {} fields, found {}",
                    headers.len(),
                    row.len()
                ),
            ));
        }
        // Keep the sample rectangular.
        while row.len() < headers.len() {
            row.push_field("");
        }
        records.push(index.record(&row));
        rows.push(row);
    }

    let table = RawTable {
        has_source: index.source.is_some(),
        columns,
        records,
    };
    Ok((table, SampleRows::Csv { headers, rows }))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the `df.to_json(orient='records')` layout:
///
/// ```json
/// [
///   { "title": "…", "journal": "…", "publish_time": "2020-03-01", … },
///   …
/// ]
/// ```
fn read_json(
    path: &Path,
    cap: Option<usize>,
    source_column: &str,
) -> Result<(RawTable, SampleRows), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let root: JsonValue =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::parse(path, e))?;

    let JsonValue::Array(mut rows) = root else {
        return Err(LoadError::parse(path, "expected top-level JSON array"));
    };
    if let Some(cap) = cap {
        rows.truncate(cap);
    }

    let mut columns = Vec::new();
    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
        records.push(json_record(obj, source_column));
    }

    let table = RawTable {
        has_source: seen.contains(source_column),
        columns,
        records,
    };
    Ok((table, SampleRows::Json(rows)))
}

fn json_record(obj: &Map<String, JsonValue>, source_column: &str) -> RawRecord {
    let get = |key: &str| match obj.get(key) {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => cell(Some(s.as_str())),
        Some(other) => Some(other.to_string()),
    };
    RawRecord {
        title: get(TITLE),
        authors: get(AUTHORS),
        journal: get(JOURNAL),
        publish_time: get(PUBLISH_TIME),
        abstract_text: get(ABSTRACT),
        source: get(source_column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DEFAULT_SOURCE_COLUMN;
    use tempfile::tempdir;

    const HEADER: &str = "cord_uid,source_x,title,authors,journal,publish_time,abstract\n";

    fn write_source(dir: &Path, rows: usize) -> PathBuf {
        let path = dir.join("metadata.csv");
        let mut text = HEADER.to_string();
        for i in 0..rows {
            text.push_str(&format!(
                "uid{i},PMC,Paper {i},Doe J.,Nature,2020-0{}-01,Some abstract text\n",
                i % 9 + 1
            ));
        }
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn first_load_is_capped_and_writes_sample() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), 25);
        let sample = dir.path().join("metadata_sample.csv");

        for cap in [0, 1, 10, 25, 100] {
            let _ = std::fs::remove_file(&sample);
            let table = load_sample(&sample, &source, cap, DEFAULT_SOURCE_COLUMN).unwrap();
            assert!(table.len() <= cap);
            assert_eq!(table.len(), cap.min(25));
            assert!(sample.exists());
        }
    }

    #[test]
    fn second_load_reads_sample_verbatim() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), 30);
        let sample = dir.path().join("metadata_sample.csv");

        let first = load_sample(&sample, &source, 10, DEFAULT_SOURCE_COLUMN).unwrap();
        let sample_bytes = std::fs::read(&sample).unwrap();

        // A different cap and a vanished source do not matter once sampled.
        std::fs::remove_file(&source).unwrap();
        let second = load_sample(&sample, &source, 5, DEFAULT_SOURCE_COLUMN).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&sample).unwrap(), sample_bytes);
    }

    #[test]
    fn sample_keeps_source_layout() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), 3);
        let sample = dir.path().join("metadata_sample.csv");

        load_sample(&sample, &source, 2, DEFAULT_SOURCE_COLUMN).unwrap();
        let text = std::fs::read_to_string(&sample).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADER.trim_end());
        assert!(lines.next().unwrap().starts_with("uid0,PMC,Paper 0"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempdir().unwrap();
        let err = load_sample(
            &dir.path().join("metadata_sample.csv"),
            &dir.path().join("metadata.csv"),
            10,
            DEFAULT_SOURCE_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingSourceFile { .. }));
        assert!(!dir.path().join("metadata_sample.csv").exists());
    }

    #[test]
    fn short_rows_load_with_missing_cells() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("metadata.csv");
        std::fs::write(
            &source,
            "title,journal,publish_time,abstract\nA,Nature,2020-01-01,x y\nB,Cell,2021-02-02\nC\n",
        )
        .unwrap();
        let sample = dir.path().join("metadata_sample.csv");

        let table = load_sample(&sample, &source, 10, DEFAULT_SOURCE_COLUMN).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[1].journal.as_deref(), Some("Cell"));
        assert_eq!(table.records[1].abstract_text, None);
        assert_eq!(table.records[2].title.as_deref(), Some("C"));
        assert_eq!(table.records[2].journal, None);
        assert_eq!(table.records[2].publish_time, None);

        // The padded sample reads back the same.
        let text = std::fs::read_to_string(&sample).unwrap();
        assert!(text.lines().any(|l| l == "C,,,"));
        let again = load_sample(&sample, &source, 10, DEFAULT_SOURCE_COLUMN).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn over_long_row_is_a_parse_failure() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("metadata.csv");
        std::fs::write(&source, "title,journal\nA,Nature\nB,Nature,extra\n").unwrap();
        let sample = dir.path().join("metadata_sample.csv");
        let err = load_sample(&sample, &source, 10, DEFAULT_SOURCE_COLUMN).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(!sample.exists());
    }

    #[test]
    fn failed_sample_write_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let sample = dir.path().join("metadata_sample.csv");

        let err = write_via_partial(&sample, |out| {
            out.write_all(b"title,journal\nA,Nat").unwrap();
            Err(LoadError::parse(&sample, "interrupted"))
        })
        .unwrap_err();

        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(!sample.exists());
        assert!(!partial_path(&sample).exists());
    }

    #[test]
    fn completed_sample_write_replaces_partial() {
        let dir = tempdir().unwrap();
        let source = write_source(dir.path(), 4);
        let sample = dir.path().join("metadata_sample.csv");

        load_sample(&sample, &source, 2, DEFAULT_SOURCE_COLUMN).unwrap();
        assert!(sample.exists());
        assert!(!dir.path().join("metadata_sample.csv.partial").exists());
    }

    #[test]
    fn na_markers_and_missing_columns_read_as_none() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("metadata.csv");
        std::fs::write(&source, "title,journal,publish_time\n,NaN,2020\nA,Cell,\n").unwrap();
        let table = load_sample(
            &dir.path().join("metadata_sample.csv"),
            &source,
            10,
            DEFAULT_SOURCE_COLUMN,
        )
        .unwrap();

        assert!(!table.has_source);
        assert_eq!(table.records[0].title, None);
        assert_eq!(table.records[0].journal, None);
        assert_eq!(table.records[0].publish_time.as_deref(), Some("2020"));
        assert_eq!(table.records[1].journal.as_deref(), Some("Cell"));
        assert_eq!(table.records[1].publish_time, None);
        assert_eq!(table.records[1].abstract_text, None);
    }

    #[test]
    fn json_records_are_sampled() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("metadata.json");
        std::fs::write(
            &source,
            r#"[{"title":"A","journal":"Nature","publish_time":"2020-01-02","source_x":"PMC"},
                {"title":null,"journal":"Cell","publish_time":2021},
                {"title":"C"}]"#,
        )
        .unwrap();
        let sample = dir.path().join("metadata_sample.json");

        let table = load_sample(&sample, &source, 2, DEFAULT_SOURCE_COLUMN).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_source);
        assert_eq!(table.records[1].title, None);
        assert_eq!(table.records[1].publish_time.as_deref(), Some("2021"));

        let again = load_sample(&sample, &source, 3, DEFAULT_SOURCE_COLUMN).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("metadata.xlsx");
        std::fs::write(&source, "").unwrap();
        let err = load_sample(&dir.path().join("s.xlsx"), &source, 1, DEFAULT_SOURCE_COLUMN)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
