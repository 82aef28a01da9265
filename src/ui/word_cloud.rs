use eframe::egui::{RichText, Ui};

use crate::color::word_color;
use crate::data::aggregate::title_word_frequencies;

const MAX_WORDS: usize = 120;
const MIN_SIZE: f32 = 11.0;
const MAX_SIZE: f32 = 42.0;

// ---------------------------------------------------------------------------
// Word cloud of paper titles
// ---------------------------------------------------------------------------

/// Lay out the most frequent title words in a wrapped block, sized by count.
pub fn word_cloud(ui: &mut Ui, corpus: &str) {
    let words = title_word_frequencies(corpus, MAX_WORDS);
    if words.is_empty() {
        ui.label("No title words to show.");
        return;
    }

    let max_count = words[0].1;
    let min_count = words[words.len() - 1].1;

    // Interleave big and small words so the block does not read as a ranking.
    let mut order: Vec<usize> = (0..words.len()).collect();
    order.sort_by_key(|&i| (i * 7919) % words.len());

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for rank in order {
            let (word, count) = &words[rank];
            let size = font_size(*count, min_count, max_count);
            ui.label(RichText::new(word).size(size).color(word_color(rank)))
                .on_hover_text(format!("{count}"));
        }
    });
}

/// Linear size between [`MIN_SIZE`] and [`MAX_SIZE`].
fn font_size(count: usize, min_count: usize, max_count: usize) -> f32 {
    if max_count <= min_count {
        return (MIN_SIZE + MAX_SIZE) / 2.0;
    }
    let t = (count - min_count) as f32 / (max_count - min_count) as f32;
    MIN_SIZE + t * (MAX_SIZE - MIN_SIZE)
}
