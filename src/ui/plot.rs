use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::ChartPalette;

pub const YEAR_PALETTE: ChartPalette = ChartPalette::Viridis;
pub const JOURNAL_PALETTE: ChartPalette = ChartPalette::Magma;
pub const SOURCE_PALETTE: ChartPalette = ChartPalette::Cool;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Publications by year
// ---------------------------------------------------------------------------

/// Vertical bars, one per year.
pub fn year_chart(ui: &mut Ui, counts: &[(i32, usize)]) {
    let colors = YEAR_PALETTE.colors(counts.len());
    let bars: Vec<Bar> = counts
        .iter()
        .zip(colors)
        .map(|(&(year, n), color)| {
            Bar::new(year as f64, n as f64)
                .width(0.7)
                .name(year)
                .fill(color)
        })
        .collect();

    Plot::new("by_year")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Publications")
        .x_axis_formatter(|mark: GridMark, _range| whole_number(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Ranked categories (journals, sources)
// ---------------------------------------------------------------------------

/// Horizontal bars, largest at the top, labelled on the category axis.
pub fn ranked_chart(
    ui: &mut Ui,
    id: &str,
    axis_label: &str,
    ranked: &[(String, usize)],
    palette: ChartPalette,
) {
    let n = ranked.len();
    let colors = palette.colors(n);
    // Rank 0 sits at the top of the chart.
    let position = move |rank: usize| (n - 1 - rank) as f64;

    let bars: Vec<Bar> = ranked
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(rank, ((label, count), color))| {
            Bar::new(position(rank), *count as f64)
                .width(0.7)
                .name(label)
                .fill(color)
        })
        .collect();

    let labels: Vec<String> = ranked.iter().map(|(label, _)| label.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT.max(22.0 * n as f32))
        .x_axis_label("Number of Papers")
        .y_axis_label(axis_label)
        .y_axis_min_width(160.0)
        .y_axis_formatter(move |mark: GridMark, _range| {
            category_label(&labels, mark.value).unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Label for a tick on the category axis, if it lands on a bar.
fn category_label(labels: &[String], value: f64) -> Option<String> {
    if value.fract() != 0.0 || value < 0.0 {
        return None;
    }
    let from_bottom = value as usize;
    let rank = labels.len().checked_sub(from_bottom + 1)?;
    labels.get(rank).cloned()
}

fn whole_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        String::new()
    }
}
