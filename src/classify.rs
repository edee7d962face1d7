//! Suitability tiers: bucketing of continuous layer values, tier ranks and colors,
//! and the legends a choropleth renderer draws from them.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Serialize, Serializer};

use crate::catalog::{Category, MIXED};

/// Lower bound of the middle band, in percent.
const LOW: f64 = 50.0;
/// Boundary between the middle bands.
const MID: f64 = 70.0;
/// Upper bound of the banded range.
const HIGH: f64 = 100.0;

/// Ordinal suitability bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Unknown,
    LessSuitable,
    ModeratelySuitable,
    HighlySuitable,
    VeryHighlySuitable,
}

impl Tier {
    /// Tiers in legend order, most suitable first.
    pub const LEGEND_ORDER: [Tier; 4] = [
        Tier::VeryHighlySuitable,
        Tier::HighlySuitable,
        Tier::ModeratelySuitable,
        Tier::LessSuitable,
    ];

    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Unknown => 0,
            Tier::LessSuitable => 1,
            Tier::ModeratelySuitable => 2,
            Tier::HighlySuitable => 3,
            Tier::VeryHighlySuitable => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Unknown => "Unknown",
            Tier::LessSuitable => "Less Suitable",
            Tier::ModeratelySuitable => "Moderately Suitable",
            Tier::HighlySuitable => "Highly Suitable",
            Tier::VeryHighlySuitable => "Very Highly Suitable",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Tier::VeryHighlySuitable => Rgb::new(0x66, 0xCC, 0x66),
            Tier::HighlySuitable => Rgb::new(0x99, 0xFF, 0x99),
            Tier::ModeratelySuitable => Rgb::new(0xFF, 0xFF, 0x99),
            Tier::LessSuitable => Rgb::new(0xCC, 0x00, 0x00),
            Tier::Unknown => Rgb::new(0xCC, 0xCC, 0xCC),
        }
    }

    /// Parse a stored tier label. `"Mixed"` and anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Tier {
        let label = label.trim();
        Tier::LEGEND_ORDER.into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
            .unwrap_or(Tier::Unknown)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Bucket a continuous layer value into a tier using the category's scale.
///
/// Adaptation uses an inverted scale: `≤50` very highly, `(50,70]` highly,
/// `(70,100]` moderately, `>100` less suitable. Every other category uses
/// `<50` less, `[50,70)` moderately, `[70,100]` highly, `>100` very highly suitable.
pub fn classify(value: Option<f64>, category: Category) -> Tier {
    let Some(v) = value.filter(|v| !v.is_nan()) else { return Tier::Unknown };

    if category.is_inverted() {
        if v <= LOW { Tier::VeryHighlySuitable }
        else if v <= MID { Tier::HighlySuitable }
        else if v <= HIGH { Tier::ModeratelySuitable }
        else { Tier::LessSuitable }
    } else if v < LOW { Tier::LessSuitable }
    else if v < MID { Tier::ModeratelySuitable }
    else if v <= HIGH { Tier::HighlySuitable }
    else { Tier::VeryHighlySuitable }
}

/// Simple RGB color, formatted as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() { return Err(anyhow!("invalid color: {s}")) }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| anyhow!("invalid color: {s}"));
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color of a stored categorical label. Substring matching, so "Very Highly" wins over "Highly".
pub fn label_color(label: &str) -> Rgb {
    Tier::LEGEND_ORDER.into_iter()
        .find(|t| label.contains(t.label()))
        .unwrap_or(Tier::Unknown)
        .color()
}

/// Three-band color for an uncategorized numeric value, split at 33 and 66.
pub fn numeric_color(value: f64) -> Rgb {
    if value.is_nan() { Tier::Unknown.color() }
    else if value > 66.0 { Tier::VeryHighlySuitable.color() }
    else if value > 33.0 { Tier::ModeratelySuitable.color() }
    else { Tier::LessSuitable.color() }
}

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub tier: Tier,
    pub color: Rgb,
    pub label: String,
}

/// Legend for continuous layer values under `category`, annotated with percentage ranges.
pub fn legend(category: Category) -> Vec<LegendEntry> {
    Tier::LEGEND_ORDER.into_iter()
        .map(|tier| {
            let range = match (category.is_inverted(), tier) {
                (true, Tier::VeryHighlySuitable) => "<50%",
                (true, Tier::HighlySuitable) => "50-70%",
                (true, Tier::ModeratelySuitable) => "70-100%",
                (true, _) => ">100%",
                (false, Tier::VeryHighlySuitable) => ">100%",
                (false, Tier::HighlySuitable) => "70-100%",
                (false, Tier::ModeratelySuitable) => "50-70%",
                (false, _) => "<50%",
            };
            LegendEntry { tier, color: tier.color(), label: format!("{} ({range})", tier.label()) }
        })
        .collect()
}

/// Legend for stored categorical labels (no ranges).
pub fn label_legend() -> Vec<LegendEntry> {
    Tier::LEGEND_ORDER.into_iter()
        .map(|tier| LegendEntry { tier, color: tier.color(), label: tier.label().to_string() })
        .collect()
}

/// Rank of a stored label, with `"Mixed"` and unknown labels ranked 0.
#[inline]
pub fn label_rank(label: &str) -> u8 {
    if label.trim() == MIXED { 0 } else { Tier::from_label(label).rank() }
}
