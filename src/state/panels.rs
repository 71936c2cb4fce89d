//! Panel keys, style enums and per-panel configuration records.

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::{Color, ValidationError};

/// Number of book categories (and of values per book region).
pub const BOOK_CATEGORY_COUNT: usize = 5;

pub const DEFAULT_REGION1: [f64; BOOK_CATEGORY_COUNT] = [1200.0, 2400.0, 1800.0, 2200.0, 1600.0];
pub const DEFAULT_REGION2: [f64; BOOK_CATEGORY_COUNT] = [1050.0, 2100.0, 1300.0, 1600.0, 1340.0];
pub const DEFAULT_BOOK_COLORS: [Color; 2] = [Color::rgb(0xFF, 0xCC, 0x00), Color::rgb(0xB0, 0xC4, 0xDE)];

pub const ANIMATION_SPEED_RANGE: RangeInclusive<u32> = 1..=10;
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 8..=32;
pub const ITERATION_RANGE: RangeInclusive<u32> = 0..=6;

/// One of the five chart panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKey {
    Book,
    Exchange,
    Sales,
    Temperature,
    Snowflake,
}

impl PanelKey {
    pub const ALL: [PanelKey; 5] = [
        PanelKey::Book,
        PanelKey::Exchange,
        PanelKey::Sales,
        PanelKey::Temperature,
        PanelKey::Snowflake,
    ];

    /// Fixed id of the render surface this panel draws on.
    pub fn surface_id(self) -> &'static str {
        match self {
            PanelKey::Book => "book-chart",
            PanelKey::Exchange => "exchange-chart",
            PanelKey::Sales => "sales-chart",
            PanelKey::Temperature => "temperature-chart",
            PanelKey::Snowflake => "snowflake-chart",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PanelKey::Book => "book",
            PanelKey::Exchange => "exchange",
            PanelKey::Sales => "sales",
            PanelKey::Temperature => "temperature",
            PanelKey::Snowflake => "snowflake",
        }
    }

    /// Human readable card title.
    pub fn display_name(self) -> &'static str {
        match self {
            PanelKey::Book => "Book Purchases",
            PanelKey::Exchange => "Exchange Rate",
            PanelKey::Sales => "Product Sales",
            PanelKey::Temperature => "Temperature",
            PanelKey::Snowflake => "Koch Snowflake",
        }
    }
}

impl fmt::Display for PanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s || key.surface_id() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "panel",
                value: s.to_string(),
            })
    }
}

/// Declares a fieldless enum with stable lowercase names, `ALL`, `Display` and `FromStr`.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum! {
    /// Line style of the exchange rate series.
    LineStyle, "style" {
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
    }
}

named_enum! {
    /// Marker symbol of the sales series.
    MarkerShape, "marker" {
        Circle => "circle",
        Square => "square",
        Diamond => "diamond",
        TriangleUp => "triangle-up",
        Cross => "cross",
        X => "x",
    }
}

named_enum! {
    /// Temperature label font style. Stored only; no renderer applies it.
    FontStyle, "font_style" {
        Normal => "normal",
        Bold => "bold",
        Italic => "italic",
    }
}

named_enum! {
    /// One of the two book purchase regions.
    BookRegion, "region" {
        Region1 => "region1",
        Region2 => "region2",
    }
}

impl BookRegion {
    pub fn index(self) -> usize {
        match self {
            BookRegion::Region1 => 0,
            BookRegion::Region2 => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookRegion::Region1 => "Region 1",
            BookRegion::Region2 => "Region 2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookConfig {
    pub region1: [f64; BOOK_CATEGORY_COUNT],
    pub region2: [f64; BOOK_CATEGORY_COUNT],
    pub colors: [Color; 2],
}

impl BookConfig {
    pub fn region(&self, region: BookRegion) -> &[f64; BOOK_CATEGORY_COUNT] {
        match region {
            BookRegion::Region1 => &self.region1,
            BookRegion::Region2 => &self.region2,
        }
    }

    pub(crate) fn region_mut(&mut self, region: BookRegion) -> &mut [f64; BOOK_CATEGORY_COUNT] {
        match region {
            BookRegion::Region1 => &mut self.region1,
            BookRegion::Region2 => &mut self.region2,
        }
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            region1: DEFAULT_REGION1,
            region2: DEFAULT_REGION2,
            colors: DEFAULT_BOOK_COLORS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeConfig {
    pub style: LineStyle,
    pub animation: bool,
    pub animation_speed: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            style: LineStyle::Solid,
            animation: false,
            animation_speed: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesConfig {
    pub marker: MarkerShape,
    pub color: Color,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            marker: MarkerShape::Diamond,
            color: Color::rgb(0x1f, 0x77, 0xb4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureConfig {
    pub font_size: u32,
    pub font_style: FontStyle,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            font_size: 12,
            font_style: FontStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowflakeConfig {
    pub iterations: u32,
    pub color: Color,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            iterations: 2,
            color: Color::rgb(0xff, 0x6b, 0x6b),
        }
    }
}

/// Snapshot of one panel's configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PanelConfig {
    Book(BookConfig),
    Exchange(ExchangeConfig),
    Sales(SalesConfig),
    Temperature(TemperatureConfig),
    Snowflake(SnowflakeConfig),
}

impl PanelConfig {
    pub fn default_for(key: PanelKey) -> Self {
        match key {
            PanelKey::Book => PanelConfig::Book(BookConfig::default()),
            PanelKey::Exchange => PanelConfig::Exchange(ExchangeConfig::default()),
            PanelKey::Sales => PanelConfig::Sales(SalesConfig::default()),
            PanelKey::Temperature => PanelConfig::Temperature(TemperatureConfig::default()),
            PanelKey::Snowflake => PanelConfig::Snowflake(SnowflakeConfig::default()),
        }
    }

    pub fn key(&self) -> PanelKey {
        match self {
            PanelConfig::Book(_) => PanelKey::Book,
            PanelConfig::Exchange(_) => PanelKey::Exchange,
            PanelConfig::Sales(_) => PanelKey::Sales,
            PanelConfig::Temperature(_) => PanelKey::Temperature,
            PanelConfig::Snowflake(_) => PanelKey::Snowflake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_ids_are_fixed() {
        let ids: Vec<&str> = PanelKey::ALL.iter().map(|k| k.surface_id()).collect();
        assert_eq!(
            ids,
            ["book-chart", "exchange-chart", "sales-chart", "temperature-chart", "snowflake-chart"]
        );
    }

    #[test]
    fn panel_key_parses_name_or_surface() {
        assert_eq!("sales".parse::<PanelKey>().unwrap(), PanelKey::Sales);
        assert_eq!("snowflake-chart".parse::<PanelKey>().unwrap(), PanelKey::Snowflake);
        assert!("pie".parse::<PanelKey>().is_err());
    }

    #[test]
    fn enums_parse_their_names() {
        for style in LineStyle::ALL {
            assert_eq!(style.as_str().parse::<LineStyle>().unwrap(), *style);
        }
        assert_eq!("triangle-up".parse::<MarkerShape>().unwrap(), MarkerShape::TriangleUp);
        assert!(matches!(
            "wavy".parse::<LineStyle>(),
            Err(ValidationError::UnknownVariant { field: "style", .. })
        ));
    }

    #[test]
    fn defaults_match_each_key() {
        for key in PanelKey::ALL {
            assert_eq!(PanelConfig::default_for(key).key(), key);
        }
    }
}
