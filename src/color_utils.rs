//! Color parsing and conversion utilities.
//!
//! This module provides the RGB color type used for polygon tags and styles,
//! CSS-style parsing, HSL brightening and the categorical palette used when
//! colors have to be generated.

use std::fmt;
use std::str::FromStr;

use crate::constants::style::{BRIGHTER_BASE, BRIGHTER_EXPONENT};
use crate::error::AnnotatorError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    pub fn parse(input: &str) -> Result<Self, AnnotatorError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid(input));
        }
        if let Some(body) = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<&str> = body.split(',').map(str::trim).collect();
            if let [r, g, b] = channels.as_slice() {
                let parse = |c: &str| c.parse::<u8>().ok();
                if let (Some(r), Some(g), Some(b)) = (parse(r), parse(g), parse(b)) {
                    return Ok(Self::rgb(r, g, b));
                }
            }
        }
        Err(invalid(input))
    }

    /// Convert to HSL.
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let mut h = if r == max {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if g == max {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h *= 60.0;
        let s = if l < 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        Hsl { h, s, l }
    }

    /// Brighten by `k` steps, each step scaling HSL lightness by [`BRIGHTER_BASE`].
    pub fn brighter(self, k: f64) -> Color {
        let mut hsl = self.to_hsl();
        hsl.l *= BRIGHTER_BASE.powf(k);
        hsl.to_rgb()
    }

    /// The fill color derived from a stroke color.
    pub fn fill_for_stroke(self) -> Color {
        self.brighter(BRIGHTER_EXPONENT)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

/// A color in HSL. Hue in degrees, saturation and lightness nominally 0.0-1.0.
///
/// Lightness may exceed 1.0 after brightening; channels are clamped when
/// converting back to RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn to_rgb(self) -> Color {
        let h = self.h.rem_euclid(360.0);
        let s = self.s;
        let l = self.l;
        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;

        let channel = |h: f64| {
            let v = if h < 60.0 {
                m1 + (m2 - m1) * h / 60.0
            } else if h < 180.0 {
                m2
            } else if h < 240.0 {
                m1 + (m2 - m1) * (240.0 - h) / 60.0
            } else {
                m1
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        Color::rgb(
            channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }),
            channel(h),
            channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }),
        )
    }
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Distinct color for a categorical index, spread around the hue wheel by
/// the golden angle.
pub fn categorical(index: usize) -> Color {
    let hue = (index as f32 * 137.5) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.9);
    let to_u8 = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::rgb(to_u8(r), to_u8(g), to_u8(b))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Color::rgb(pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

fn invalid(input: &str) -> AnnotatorError {
    AnnotatorError::unsupported_input(format!("unrecognized color '{}'", input))
}
