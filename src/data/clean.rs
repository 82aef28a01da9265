use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::{Paper, PaperTable, RawRecord, RawTable};

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_JOURNAL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Normalise every row: parse dates, fill defaults, derive `year` and
/// `abstract_word_count`. Never fails; bad values become absent.
pub fn clean(table: &RawTable) -> PaperTable {
    PaperTable {
        papers: table.records.iter().map(clean_record).collect(),
        has_source: table.has_source,
    }
}

fn clean_record(raw: &RawRecord) -> Paper {
    let publish_time = raw.publish_time.as_deref().and_then(parse_publish_time);
    let abstract_text = raw.abstract_text.clone().unwrap_or_default();
    let abstract_word_count = abstract_text.split_whitespace().count();

    Paper {
        title: raw
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        authors: raw.authors.clone(),
        journal: raw
            .journal
            .clone()
            .unwrap_or_else(|| DEFAULT_JOURNAL.to_string()),
        publish_time,
        abstract_text,
        source: raw.source.clone(),
        year: publish_time.map(|d| d.year()),
        abstract_word_count,
    }
}

/// Date layouts seen in `publish_time`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a publication date. Year-only and year-month values resolve to the
/// first day of the period. Returns `None` for anything unrecognised.
pub fn parse_publish_time(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    // "2020" and "2020-03"
    let mut parts = text.splitn(2, '-');
    let year = parts
        .next()
        .filter(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))?
        .parse::<i32>()
        .ok()?;
    let month = match parts.next() {
        Some(m) if (1..=2).contains(&m.len()) && m.bytes().all(|b| b.is_ascii_digit()) => {
            m.parse::<u32>().ok()?
        }
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, journal: Option<&str>, publish: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.map(String::from),
            journal: journal.map(String::from),
            publish_time: publish.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn fills_defaults() {
        let table = RawTable {
            records: vec![raw(None, None, None), raw(Some("T"), Some("Cell"), None)],
            ..Default::default()
        };
        let cleaned = clean(&table);

        for paper in &cleaned.papers {
            assert!(!paper.title.is_empty());
            assert!(!paper.journal.is_empty());
        }
        assert_eq!(cleaned.papers[0].title, "No Title");
        assert_eq!(cleaned.papers[0].journal, "Unknown");
        assert_eq!(cleaned.papers[0].abstract_text, "");
        assert_eq!(cleaned.papers[0].abstract_word_count, 0);
        assert_eq!(cleaned.papers[1].title, "T");
        assert_eq!(cleaned.papers[1].journal, "Cell");
    }

    #[test]
    fn year_is_absent_exactly_when_date_is() {
        let table = RawTable {
            records: vec![
                raw(None, None, Some("2020-03-15")),
                raw(None, None, Some("not a date")),
                raw(None, None, None),
                raw(None, None, Some("2021")),
            ],
            ..Default::default()
        };
        let cleaned = clean(&table);
        let years: Vec<_> = cleaned.papers.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![Some(2020), None, None, Some(2021)]);
        for paper in &cleaned.papers {
            assert_eq!(paper.year.is_none(), paper.publish_time.is_none());
        }
    }

    #[test]
    fn counts_abstract_words() {
        let table = RawTable {
            records: vec![RawRecord {
                abstract_text: Some("  Background:\tSARS-CoV-2 spreads\nfast. ".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(clean(&table).papers[0].abstract_word_count, 4);
    }

    #[test]
    fn empty_table_stays_empty() {
        let table = RawTable {
            has_source: true,
            ..Default::default()
        };
        let cleaned = clean(&table);
        assert!(cleaned.is_empty());
        assert!(cleaned.has_source);
    }

    #[test]
    fn parses_common_date_layouts() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(parse_publish_time("2020-03-15"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020/03/15"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15 10:20:30"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15T10:20:30Z"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03"), d(2020, 3, 1));
        assert_eq!(parse_publish_time("2019"), d(2019, 1, 1));
        assert_eq!(parse_publish_time("2020-13"), None);
        assert_eq!(parse_publish_time("Spring 2020"), None);
        assert_eq!(parse_publish_time("+202"), None);
        assert_eq!(parse_publish_time("-202"), None);
        assert_eq!(parse_publish_time("2020-+3"), None);
        assert_eq!(parse_publish_time(""), None);
    }
}
