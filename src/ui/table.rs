use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Paper, PaperTable};

const ROW_HEIGHT: f32 = 18.0;
const ABSTRACT_PREVIEW_CHARS: usize = 120;

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// Show the first `max_rows` papers with title, authors, journal, year and
/// abstract columns.
pub fn preview_table(ui: &mut Ui, table: &PaperTable, max_rows: usize) {
    let rows: Vec<&Paper> = table.papers.iter().take(max_rows).collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(ROW_HEIGHT * 16.0)
        .column(Column::initial(280.0).at_least(80.0).clip(true))
        .column(Column::initial(160.0).at_least(60.0).clip(true))
        .column(Column::initial(140.0).at_least(60.0).clip(true))
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder().clip(true))
        .header(20.0, |mut header| {
            for name in ["title", "authors", "journal", "year", "abstract"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let paper = rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&paper.title);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(paper.authors.as_deref().unwrap_or(""));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&paper.journal);
                });
                row.col(|ui: &mut Ui| {
                    let year = ui.label(paper.year.map(|y| y.to_string()).unwrap_or_default());
                    if let Some(date) = paper.publish_time {
                        year.on_hover_text(date.format("%Y-%m-%d").to_string());
                    }
                });
                row.col(|ui: &mut Ui| {
                    ui.label(truncate(&paper.abstract_text, ABSTRACT_PREVIEW_CHARS))
                        .on_hover_text(&paper.abstract_text);
                });
            });
        });
}

/// Cut `text` to at most `max_chars` characters, marking the cut with "…".
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
