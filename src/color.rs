use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Bar palettes
// ---------------------------------------------------------------------------

/// Sequential palettes for the bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPalette {
    /// Purple → green → yellow.
    Viridis,
    /// Black-purple → orange → pale yellow.
    Magma,
    /// Cyan → magenta.
    Cool,
}

impl ChartPalette {
    /// Anchor colours interpolated across the bars.
    fn stops(self) -> [Hsl; 3] {
        match self {
            ChartPalette::Viridis => [
                Hsl::new(285.0, 0.65, 0.28),
                Hsl::new(175.0, 0.55, 0.40),
                Hsl::new(55.0, 0.90, 0.55),
            ],
            ChartPalette::Magma => [
                Hsl::new(265.0, 0.60, 0.20),
                Hsl::new(345.0, 0.65, 0.50),
                Hsl::new(35.0, 0.95, 0.75),
            ],
            ChartPalette::Cool => [
                Hsl::new(180.0, 0.90, 0.50),
                Hsl::new(240.0, 0.80, 0.65),
                Hsl::new(300.0, 0.90, 0.50),
            ],
        }
    }

    /// `n` colours evenly spaced along the palette.
    pub fn colors(self, n: usize) -> Vec<Color32> {
        if n == 0 {
            return Vec::new();
        }
        let [start, middle, end] = self.stops();
        (0..n)
            .map(|i| {
                let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
                let hsl = if t < 0.5 {
                    start.mix(middle, t * 2.0)
                } else {
                    middle.mix(end, (t - 0.5) * 2.0)
                };
                to_color32(hsl)
            })
            .collect()
    }
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Colour for one word of the word cloud, cycling through evenly spaced hues.
pub fn word_color(rank: usize) -> Color32 {
    let hue = (rank as f32 * 137.5) % 360.0;
    to_color32(Hsl::new(hue, 0.60, 0.40))
}
