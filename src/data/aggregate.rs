use std::collections::{BTreeMap, HashMap};

use super::model::PaperTable;

/// Words left out of the title word cloud.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "against", "all", "also", "among", "an", "and", "are", "as", "at",
    "based", "be", "between", "but", "by", "can", "during", "for", "from", "has", "have", "in",
    "into", "is", "it", "its", "may", "new", "non", "not", "of", "on", "or", "our", "over", "that",
    "the", "their", "these", "this", "through", "to", "under", "using", "via", "was", "we",
    "were", "what", "when", "which", "while", "who", "why", "with", "within", "without",
];

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Papers per year, ascending by year. Rows without a year are not counted.
pub fn counts_by_year(table: &PaperTable) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in table.papers.iter().filter_map(|p| p.year) {
        *counts.entry(year).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// The `k` most frequent journals, descending by count.
pub fn top_journals(table: &PaperTable, k: usize) -> Vec<(String, usize)> {
    top_k(table.papers.iter().map(|p| p.journal.as_str()), k)
}

/// The `k` most frequent source labels over rows that have one, or `None`
/// when the table has no source column at all.
pub fn top_sources(table: &PaperTable, k: usize) -> Option<Vec<(String, usize)>> {
    if !table.has_source {
        return None;
    }
    Some(top_k(
        table.papers.iter().filter_map(|p| p.source.as_deref()),
        k,
    ))
}

/// All titles joined by single spaces, in table order.
pub fn title_corpus(table: &PaperTable) -> String {
    table
        .papers
        .iter()
        .map(|p| p.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Count values and keep the `k` largest. Ties keep first-seen order.
fn top_k<'a>(values: impl Iterator<Item = &'a str>, k: usize) -> Vec<(String, usize)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match position.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    // Stable sort keeps encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

// ---------------------------------------------------------------------------
// Word frequencies for the word cloud
// ---------------------------------------------------------------------------

/// Lowercased word counts of `corpus`, most frequent first, at most `limit`
/// entries. Stopwords, numbers and one-character tokens are dropped.
pub fn title_word_frequencies(corpus: &str, limit: usize) -> Vec<(String, usize)> {
    let words: Vec<String> = corpus
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|w| w.trim_matches('-').to_lowercase())
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !w.chars().all(|c| c.is_numeric() || c == '-'))
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect();
    top_k(words.iter().map(String::as_str), limit)
}

// ---------------------------------------------------------------------------
// Summary bundle
// ---------------------------------------------------------------------------

/// Everything the charts need for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub paper_count: usize,
    pub by_year: Vec<(i32, usize)>,
    pub top_journals: Vec<(String, usize)>,
    pub top_sources: Option<Vec<(String, usize)>>,
    pub title_corpus: String,
    pub mean_abstract_words: f64,
}

impl Summary {
    /// Compute all views, or `None` for an empty table so rendering is skipped.
    pub fn compute(filtered: &PaperTable, top_n: usize) -> Option<Self> {
        if filtered.is_empty() {
            return None;
        }
        let total_words: usize = filtered.papers.iter().map(|p| p.abstract_word_count).sum();
        Some(Summary {
            paper_count: filtered.len(),
            by_year: counts_by_year(filtered),
            top_journals: top_journals(filtered, top_n),
            top_sources: top_sources(filtered, top_n),
            title_corpus: title_corpus(filtered),
            mean_abstract_words: total_words as f64 / filtered.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Paper;

    fn paper(year: Option<i32>, journal: &str, source: Option<&str>, title: &str) -> Paper {
        Paper {
            title: title.to_string(),
            authors: None,
            journal: journal.to_string(),
            publish_time: None,
            abstract_text: String::new(),
            source: source.map(String::from),
            year,
            abstract_word_count: 0,
        }
    }

    fn journals(names: &[&str]) -> PaperTable {
        PaperTable {
            papers: names
                .iter()
                .map(|j| paper(Some(2020), j, None, "t"))
                .collect(),
            has_source: false,
        }
    }

    #[test]
    fn year_counts_are_sorted_and_sum_to_rows() {
        let table = PaperTable {
            papers: [2021, 2020, 2021, 2019]
                .iter()
                .map(|&y| paper(Some(y), "j", None, "t"))
                .collect(),
            has_source: false,
        };
        let counts = counts_by_year(&table);
        assert_eq!(counts, vec![(2019, 1), (2020, 1), (2021, 2)]);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), table.len());
    }

    #[test]
    fn top_journals_descending_with_encounter_tie_break() {
        let table = journals(&["B", "A", "C", "A", "B", "D", "C"]);
        let top = top_journals(&table, 10);
        assert_eq!(
            top,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 2),
                ("D".to_string(), 1),
            ]
        );
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn top_journals_truncates_to_k() {
        let names: Vec<String> = (0..15).map(|i| format!("J{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let top = top_journals(&journals(&refs), 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].0, "J0");
        assert_eq!(top[9].0, "J9");
    }

    #[test]
    fn sources_skipped_without_column() {
        let table = journals(&["A"]);
        assert_eq!(top_sources(&table, 10), None);
    }

    #[test]
    fn sources_count_only_present_labels() {
        let table = PaperTable {
            papers: vec![
                paper(Some(2020), "j", Some("PMC"), "t"),
                paper(Some(2020), "j", None, "t"),
                paper(Some(2020), "j", Some("Medline"), "t"),
                paper(Some(2020), "j", Some("PMC"), "t"),
            ],
            has_source: true,
        };
        assert_eq!(
            top_sources(&table, 10),
            Some(vec![("PMC".to_string(), 2), ("Medline".to_string(), 1)])
        );
    }

    #[test]
    fn corpus_joins_titles_in_order() {
        let table = PaperTable {
            papers: vec![
                paper(None, "j", None, "Alpha beta"),
                paper(None, "j", None, "No Title"),
                paper(None, "j", None, "gamma"),
            ],
            has_source: false,
        };
        assert_eq!(title_corpus(&table), "Alpha beta No Title gamma");
    }

    #[test]
    fn word_frequencies_skip_noise() {
        let freq = title_word_frequencies(
            "The COVID-19 outbreak: COVID-19 in Wuhan, 2020. A covid-19 study of the outbreak",
            3,
        );
        assert_eq!(
            freq,
            vec![("covid-19".to_string(), 3), ("outbreak".to_string(), 2), ("wuhan".to_string(), 1)]
        );
    }

    #[test]
    fn summary_is_none_for_empty_table() {
        assert_eq!(Summary::compute(&PaperTable::default(), 10), None);
    }

    #[test]
    fn summary_bundles_views() {
        let mut table = journals(&["Nature", "Unknown", "Nature"]);
        table.papers[0].abstract_word_count = 3;
        table.papers[1].abstract_word_count = 6;
        let summary = Summary::compute(&table, 10).unwrap();
        assert_eq!(summary.paper_count, 3);
        assert_eq!(summary.by_year, vec![(2020, 3)]);
        assert_eq!(summary.top_journals[0], ("Nature".to_string(), 2));
        assert_eq!(summary.top_sources, None);
        assert!((summary.mean_abstract_words - 3.0).abs() < f64::EPSILON);
    }
}
