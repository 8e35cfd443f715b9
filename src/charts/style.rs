//! Chart Style Module
//! Colors, line styles, markers and grid settings shared by surfaces and the renderer.

use crate::charts::ChartError;
use plotters::style::{RGBAColor, RGBColor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color. Transparency is chosen per draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colors, matplotlib spellings.
const NAMED_COLORS: [(&str, Color); 36] = [
    ("black", Color::rgb(0, 0, 0)),
    ("k", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("w", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("r", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("g", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("b", Color::rgb(0, 0, 255)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("c", Color::rgb(0, 191, 191)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("m", Color::rgb(191, 0, 191)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("y", Color::rgb(191, 191, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("dodgerblue", Color::rgb(30, 144, 255)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("gold", Color::rgb(255, 215, 0)),
    ("tab:blue", Color::rgb(31, 119, 180)),
    ("tab:orange", Color::rgb(255, 127, 14)),
    ("tab:green", Color::rgb(44, 160, 44)),
    ("tab:red", Color::rgb(214, 39, 40)),
    ("tab:purple", Color::rgb(148, 103, 189)),
    ("tab:brown", Color::rgb(140, 86, 75)),
    ("tab:pink", Color::rgb(227, 119, 194)),
    ("tab:gray", Color::rgb(127, 127, 127)),
    ("tab:olive", Color::rgb(188, 189, 34)),
    ("tab:cyan", Color::rgb(23, 190, 207)),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const DODGER_BLUE: Color = Color::rgb(30, 144, 255);
    pub const SALMON: Color = Color::rgb(250, 128, 114);
    /// Grid line gray
    pub const GRID: Color = Color::rgb(176, 176, 176);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Plotters color with the given opacity in `[0, 1]`.
    pub fn to_rgba(self, alpha: f64) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }

    pub fn to_rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if let Some(hex) = name.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ChartError::UnknownColor(s.to_string()));
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
            .ok_or_else(|| ChartError::UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Stroke pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::Dotted => ":",
            LineStyle::DashDot => "-.",
        }
    }

    /// Dash length and gap, in multiples of the stroke width. `None` is solid.
    pub fn dash_pattern(&self) -> Option<(u32, u32)> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some((6, 4)),
            LineStyle::DashDot => Some((4, 3)),
            LineStyle::Dotted => Some((1, 3)),
        }
    }
}

impl FromStr for LineStyle {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            "-." | "dashdot" => Ok(LineStyle::DashDot),
            other => Err(ChartError::UnknownLineStyle(other.to_string())),
        }
    }
}

impl TryFrom<String> for LineStyle {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LineStyle> for String {
    fn from(style: LineStyle) -> Self {
        style.as_str().to_string()
    }
}

/// Which tick lines a grid follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GridLines {
    Major,
    Minor,
    Both,
}

impl GridLines {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridLines::Major => "major",
            GridLines::Minor => "minor",
            GridLines::Both => "both",
        }
    }

    pub fn includes_major(&self) -> bool {
        matches!(self, GridLines::Major | GridLines::Both)
    }

    pub fn includes_minor(&self) -> bool {
        matches!(self, GridLines::Minor | GridLines::Both)
    }
}

impl FromStr for GridLines {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(GridLines::Major),
            "minor" => Ok(GridLines::Minor),
            "both" => Ok(GridLines::Both),
            _ => Err(ChartError::UnknownGridLines(s.to_string())),
        }
    }
}

impl TryFrom<String> for GridLines {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridLines> for String {
    fn from(which: GridLines) -> Self {
        which.as_str().to_string()
    }
}

/// Caller overrides for grid lines. Unset fields fall back to [`GridStyle::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub which: Option<GridLines>,
    pub linestyle: Option<LineStyle>,
    pub linewidth: Option<f64>,
}

impl GridSettings {
    /// Merge over the defaults.
    pub fn resolve(&self) -> GridStyle {
        let defaults = GridStyle::default();
        GridStyle {
            which: self.which.unwrap_or(defaults.which),
            linestyle: self.linestyle.unwrap_or(defaults.linestyle),
            linewidth: self.linewidth.unwrap_or(defaults.linewidth),
        }
    }
}

/// Fully resolved grid appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub which: GridLines,
    pub linestyle: LineStyle,
    pub linewidth: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            which: GridLines::Major,
            linestyle: LineStyle::Dashed,
            linewidth: 0.5,
        }
    }
}

/// Point marker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    TriangleUp,
    TriangleDown,
}
