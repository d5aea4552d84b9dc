//! Polygon styling from a small set of cyclable palettes.

use crate::color_utils::Color;
use crate::constants::style::{BRIGHT_RGB, WHITE_RGB};
use crate::store::PolygonStore;

/// A named palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Every polygon white.
    White,
    /// Every polygon in a saturated magenta.
    Bright,
    /// Per-polygon colors from the seed data; untagged polygons fall back to white.
    Data,
}

impl Palette {
    pub fn name(&self) -> &'static str {
        match self {
            Palette::White => "white",
            Palette::Bright => "bright",
            Palette::Data => "data",
        }
    }

    /// Stroke used when a polygon has no usable data color.
    pub fn base_hue(&self) -> Color {
        match self {
            Palette::White | Palette::Data => Color::from(WHITE_RGB),
            Palette::Bright => Color::from(BRIGHT_RGB),
        }
    }
}

/// Stroke and fill for one polygon. The fill is always a brightened stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonStyle {
    pub stroke: Color,
    pub fill: Color,
}

impl PolygonStyle {
    pub fn from_stroke(stroke: Color) -> Self {
        Self {
            stroke,
            fill: stroke.fill_for_stroke(),
        }
    }
}

const PLAIN: &[Palette] = &[Palette::White, Palette::Bright];
const WITH_DATA: &[Palette] = &[Palette::White, Palette::Bright, Palette::Data];

/// The active palette list and the index into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPolicy {
    palettes: &'static [Palette],
    index: usize,
}

impl ColorPolicy {
    /// Palettes for a store with or without seed colors. With seed colors
    /// the data palette is listed last and selected first.
    pub fn new(has_data_colors: bool) -> Self {
        if has_data_colors {
            Self {
                palettes: WITH_DATA,
                index: WITH_DATA.len() - 1,
            }
        } else {
            Self {
                palettes: PLAIN,
                index: 0,
            }
        }
    }

    pub fn palettes(&self) -> &[Palette] {
        self.palettes
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn active(&self) -> Palette {
        self.palettes[self.index]
    }

    /// Step the palette index by `direction`, wrapping in both directions.
    pub fn cycle(&mut self, direction: i32) -> Palette {
        let len = self.palettes.len() as i64;
        self.index = (self.index as i64 + i64::from(direction)).rem_euclid(len) as usize;
        log::debug!("Palette: {} ({})", self.active().name(), self.index);
        self.active()
    }

    /// Drop the data palette once no tagged polygon is left.
    pub fn downgrade(&mut self) {
        if self.palettes != PLAIN || self.index != 0 {
            log::debug!("Palette downgraded to {}", Palette::White.name());
        }
        self.palettes = PLAIN;
        self.index = 0;
    }

    /// Style for a single polygon with an optional data color.
    pub fn style(&self, data_color: Option<Color>) -> PolygonStyle {
        let active = self.active();
        let stroke = match (active, data_color) {
            (Palette::Data, Some(color)) => color,
            _ => active.base_hue(),
        };
        PolygonStyle::from_stroke(stroke)
    }

    /// Styles for every polygon in the store, in index order.
    pub fn styles(&self, store: &PolygonStore) -> Vec<PolygonStyle> {
        store.iter().map(|poly| self.style(poly.color)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let plain = ColorPolicy::new(false);
        assert_eq!(plain.palettes(), &[Palette::White, Palette::Bright]);
        assert_eq!(plain.active(), Palette::White);

        let data = ColorPolicy::new(true);
        assert_eq!(data.index(), 2);
        assert_eq!(data.active(), Palette::Data);
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut policy = ColorPolicy::new(false);
        assert_eq!(policy.cycle(-1), Palette::Bright);
        assert_eq!(policy.index(), 1);
        assert_eq!(policy.cycle(1), Palette::White);
        assert_eq!(policy.index(), 0);

        let mut policy = ColorPolicy::new(true);
        assert_eq!(policy.cycle(1), Palette::White);
        assert_eq!(policy.cycle(-1), Palette::Data);
    }

    #[test]
    fn test_styles_per_palette() {
        let red = Color::rgb(255, 0, 0);
        let mut policy = ColorPolicy::new(true);

        let data = policy.style(Some(red));
        assert_eq!(data.stroke, red);
        assert_eq!(data.fill, red.fill_for_stroke());

        // Data palette without a tag falls back to white for that polygon only
        assert_eq!(policy.style(None).stroke, Color::WHITE);

        policy.cycle(-1);
        assert_eq!(policy.active(), Palette::Bright);
        let bright = policy.style(Some(red));
        assert_eq!(bright.stroke, Color::rgb(240, 30, 110));
        assert_ne!(bright.fill, bright.stroke);
    }

    #[test]
    fn test_downgrade() {
        let mut policy = ColorPolicy::new(true);
        policy.downgrade();
        assert_eq!(policy, ColorPolicy::new(false));
        assert_eq!(policy.active(), Palette::White);
    }
}
