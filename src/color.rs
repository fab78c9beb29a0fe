use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Continent;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Continent colours
// ---------------------------------------------------------------------------

/// Fixed continent → colour assignment, shared by every chart so a
/// continent keeps its colour whatever the filter.
#[derive(Debug, Clone)]
pub struct ContinentPalette {
    mapping: BTreeMap<Continent, Color32>,
}

impl Default for ContinentPalette {
    fn default() -> Self {
        let mapping = Continent::ALL
            .into_iter()
            .zip(generate_palette(Continent::ALL.len()))
            .collect();
        ContinentPalette { mapping }
    }
}

impl ContinentPalette {
    pub fn color_for(&self, continent: Continent) -> Color32 {
        self.mapping
            .get(&continent)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Density ramp
// ---------------------------------------------------------------------------

/// Sequential ramp for heatmap cells; `t` is clamped to `[0, 1]`.
pub fn density_color(t: f32) -> Color32 {
    let low: LinSrgb = Srgb::new(0.94, 0.96, 1.0).into_linear();
    let high: LinSrgb = Srgb::new(0.05, 0.19, 0.52).into_linear();
    let mixed = low.mix(high, t.clamp(0.0, 1.0));
    to_color32(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_distinct_colours() {
        let colours = generate_palette(5);
        assert_eq!(colours.len(), 5);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn every_continent_has_its_own_colour() {
        let palette = ContinentPalette::default();
        let colours: std::collections::BTreeSet<[u8; 4]> = Continent::ALL
            .into_iter()
            .map(|c| palette.color_for(c).to_array())
            .collect();
        assert_eq!(colours.len(), Continent::ALL.len());
    }

    #[test]
    fn density_ramp_darkens_with_count() {
        let light = density_color(0.0);
        let dark = density_color(1.0);
        assert!(light.r() > dark.r());
        assert!(light.b() >= dark.b());
        assert_eq!(density_color(2.0), dark);
    }
}
