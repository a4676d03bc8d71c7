use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Brand colours
// ---------------------------------------------------------------------------

const COUNTRY_COLORS: [(&str, Color32); 6] = [
    ("Australia", Color32::from_rgb(0xFF, 0xB3, 0x00)),
    ("UK", Color32::from_rgb(0x1E, 0x3A, 0x8A)),
    ("India", Color32::from_rgb(0xF5, 0x7C, 0x00)),
    ("USA", Color32::from_rgb(0x15, 0x65, 0xC0)),
    ("Canada", Color32::from_rgb(0xC6, 0x28, 0x28)),
    ("New Zealand", Color32::from_rgb(0x2E, 0x7D, 0x32)),
];

const PRODUCT_COLORS: [(&str, Color32); 4] = [
    ("Chocolate Amargo", Color32::from_rgb(0x4E, 0x34, 0x2E)),
    ("Chocolate Ao Leite", Color32::from_rgb(0x6D, 0x4C, 0x41)),
    ("Chocolate Branco", Color32::from_rgb(0xF5, 0xF5, 0xDC)),
    ("Chocolate Meio Amargo", Color32::from_rgb(0x5D, 0x40, 0x37)),
];

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category name → Color32
// ---------------------------------------------------------------------------

/// Maps category names (countries or products) to colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Known names keep their fixed colour; the rest share a generated palette.
    fn with_fixed(fixed: &[(&str, Color32)], keys: &BTreeSet<String>) -> Self {
        let unknown: Vec<&String> = keys
            .iter()
            .filter(|k| !fixed.iter().any(|(name, _)| *name == k.as_str()))
            .collect();
        let palette = generate_palette(unknown.len());

        let mut mapping: BTreeMap<String, Color32> = fixed
            .iter()
            .map(|(name, c)| (name.to_string(), *c))
            .collect();
        mapping.extend(unknown.into_iter().cloned().zip(palette));

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn for_countries(countries: &BTreeSet<String>) -> Self {
        Self::with_fixed(&COUNTRY_COLORS, countries)
    }

    pub fn for_products(products: &BTreeSet<String>) -> Self {
        Self::with_fixed(&PRODUCT_COLORS, products)
    }

    /// Look up the colour for a category name.
    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::with_fixed(&[], &BTreeSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn known_countries_keep_brand_colours() {
        let keys: BTreeSet<String> =
            ["USA", "Brazil", "Chile"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::for_countries(&keys);
        assert_eq!(map.color_for("USA"), Color32::from_rgb(0x15, 0x65, 0xC0));
        assert_ne!(map.color_for("Brazil"), Color32::GRAY);
        assert_ne!(map.color_for("Brazil"), map.color_for("Chile"));
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }

    #[test]
    fn products_use_chocolate_shades() {
        let map = ColorMap::for_products(&BTreeSet::new());
        assert_eq!(
            map.color_for("Chocolate Branco"),
            Color32::from_rgb(0xF5, 0xF5, 0xDC)
        );
    }
}
