use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{plot, table, word_cloud};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    if dataset.table.is_empty() {
        ui.label("Dataset is empty.");
        return;
    }

    // ---- Year range ----
    ui.strong("Select Year Range");
    let bounds = dataset.bounds;
    let mut year_min = state.filters.year_min;
    let mut year_max = state.filters.year_max;
    // Only user edits are clamped; the initial range may sit outside the bounds.
    ui.add(
        egui::Slider::new(&mut year_min, bounds.min..=bounds.max)
            .clamping(egui::SliderClamping::Edits)
            .text("from"),
    );
    ui.add(
        egui::Slider::new(&mut year_max, bounds.min..=bounds.max)
            .clamping(egui::SliderClamping::Edits)
            .text("to"),
    );
    state.set_year_range(year_min, year_max);
    ui.separator();

    // ---- Journal ----
    ui.strong("Select Journal");
    let current = state.filters.journal.label().to_string();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("journal")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.journal_options {
                if ui.selectable_label(current == *option, option).clicked() {
                    picked = Some(option.clone());
                }
            }
        });
    if let Some(label) = picked {
        state.select_journal(&label);
    }
}

// ---------------------------------------------------------------------------
// Central panel – preview and charts
// ---------------------------------------------------------------------------

/// Render the preview table and every chart for the current selection.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("CORD-19 Data Explorer");
    ui.label("Explore COVID-19 research papers using the metadata dataset.");
    ui.separator();

    if !state.has_data() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No papers loaded  (File → Open source…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("Dataset Preview ({} papers)", state.filtered.len()));
            table::preview_table(ui, &state.filtered, state.config.preview_rows);

            // Nothing to chart for an empty selection.
            let Some(summary) = &state.summary else {
                return;
            };
            ui.label(format!(
                "{} papers, average abstract length {:.1} words",
                summary.paper_count, summary.mean_abstract_words
            ));
            ui.separator();

            ui.heading("Publications by Year");
            plot::year_chart(ui, &summary.by_year);
            ui.separator();

            ui.heading("Top Journals");
            plot::ranked_chart(
                ui,
                "top_journals",
                "Journal",
                &summary.top_journals,
                plot::JOURNAL_PALETTE,
            );
            ui.separator();

            ui.heading("Word Cloud of Paper Titles");
            word_cloud::word_cloud(ui, &summary.title_corpus);

            if let Some(sources) = &summary.top_sources {
                ui.separator();
                ui.heading("Source Distribution");
                plot::ranked_chart(ui, "top_sources", "Source", sources, plot::SOURCE_PALETTE);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open source…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} papers loaded, {} visible",
                ds.table.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open paper metadata")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening source {}", path.display());
        state.open_source(path);
    }
}
