//! Chart State Store
//! Owns one configuration record per panel and exposes the only mutation paths.

use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::debug;

use super::panels::{
    ANIMATION_SPEED_RANGE, BOOK_CATEGORY_COUNT, FONT_SIZE_RANGE, ITERATION_RANGE,
};
use super::{
    BookConfig, BookRegion, Color, ExchangeConfig, FontStyle, LineStyle, MarkerShape, PanelConfig,
    PanelKey, ParseError, SalesConfig, SnowflakeConfig, StateError, TemperatureConfig,
    ValidationError,
};

/// Per-panel chart configuration.
///
/// Every field has a default and every mutation either fully succeeds or
/// leaves the store untouched. The store never triggers a redraw itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartStateStore {
    book: BookConfig,
    exchange: ExchangeConfig,
    sales: SalesConfig,
    temperature: TemperatureConfig,
    snowflake: SnowflakeConfig,
}

fn check_range(field: &'static str, value: u32, range: RangeInclusive<u32>) -> Result<u32, ValidationError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: i64::from(value),
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Parse comma separated numbers into one book series.
fn parse_series(raw: &str) -> Result<[f64; BOOK_CATEGORY_COUNT], StateError> {
    let values = raw
        .split(',')
        .enumerate()
        .map(|(position, token)| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| ParseError {
                token: token.to_string(),
                position,
            })
        })
        .collect::<Result<Vec<f64>, ParseError>>()?;

    let series: [f64; BOOK_CATEGORY_COUNT] =
        values
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::LengthMismatch {
                expected: BOOK_CATEGORY_COUNT,
                found: values.len(),
            })?;

    if let Some((position, &value)) = series
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(ValidationError::InvalidValue { position, value }.into());
    }

    Ok(series)
}

impl ChartStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot of one panel's configuration.
    pub fn get(&self, panel: PanelKey) -> PanelConfig {
        match panel {
            PanelKey::Book => PanelConfig::Book(self.book.clone()),
            PanelKey::Exchange => PanelConfig::Exchange(self.exchange.clone()),
            PanelKey::Sales => PanelConfig::Sales(self.sales.clone()),
            PanelKey::Temperature => PanelConfig::Temperature(self.temperature.clone()),
            PanelKey::Snowflake => PanelConfig::Snowflake(self.snowflake.clone()),
        }
    }

    pub fn book(&self) -> &BookConfig {
        &self.book
    }

    pub fn exchange(&self) -> &ExchangeConfig {
        &self.exchange
    }

    pub fn sales(&self) -> &SalesConfig {
        &self.sales
    }

    pub fn temperature(&self) -> &TemperatureConfig {
        &self.temperature
    }

    pub fn snowflake(&self) -> &SnowflakeConfig {
        &self.snowflake
    }

    // ===== Book =====

    /// Multiply every value of a book series by `factor`.
    pub fn scale(&mut self, panel: PanelKey, field: &str, factor: f64) -> Result<(), StateError> {
        if panel != PanelKey::Book {
            return Err(ValidationError::Unsupported {
                panel,
                operation: "scale",
            }
            .into());
        }
        let region = Self::book_region(field)?;
        self.scale_book(region, factor)
    }

    pub fn scale_book(&mut self, region: BookRegion, factor: f64) -> Result<(), StateError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(ValidationError::InvalidFactor(factor).into());
        }
        let mut scaled = *self.book.region(region);
        scaled.iter_mut().for_each(|v| *v *= factor);
        if let Some((position, &value)) = scaled.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::InvalidValue { position, value }.into());
        }
        *self.book.region_mut(region) = scaled;
        debug!(%region, factor, "scaled book series");
        Ok(())
    }

    /// Replace a book series from comma separated text. All or nothing.
    pub fn parse_and_set(&mut self, panel: PanelKey, field: &str, raw: &str) -> Result<(), StateError> {
        if panel != PanelKey::Book {
            return Err(ValidationError::Unsupported {
                panel,
                operation: "numeric series input",
            }
            .into());
        }
        let region = Self::book_region(field)?;
        let series = parse_series(raw)?;
        *self.book.region_mut(region) = series;
        debug!(%region, ?series, "replaced book series");
        Ok(())
    }

    /// Replace both book series at once; neither changes unless both parse.
    pub fn parse_and_set_book(&mut self, region1: &str, region2: &str) -> Result<(), StateError> {
        let first = parse_series(region1)?;
        let second = parse_series(region2)?;
        self.book.region1 = first;
        self.book.region2 = second;
        debug!(region1 = ?first, region2 = ?second, "replaced both book series");
        Ok(())
    }

    pub fn set_book_color(&mut self, region: BookRegion, color: Color) {
        self.book.colors[region.index()] = color;
        debug!(%region, %color, "set book color");
    }

    fn book_region(field: &str) -> Result<BookRegion, ValidationError> {
        field.parse().map_err(|_| ValidationError::UnknownField {
            panel: PanelKey::Book,
            field: field.to_string(),
        })
    }

    // ===== Exchange =====

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.exchange.style = style;
        debug!(%style, "set exchange line style");
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.exchange.animation = enabled;
        debug!(enabled, "set exchange animation");
    }

    /// Flip the animation flag and return the new value.
    pub fn toggle_animation(&mut self) -> bool {
        self.set_animation_enabled(!self.exchange.animation);
        self.exchange.animation
    }

    pub fn set_animation_speed(&mut self, speed: u32) -> Result<(), StateError> {
        self.exchange.animation_speed = check_range("animation_speed", speed, ANIMATION_SPEED_RANGE)?;
        debug!(speed, "set exchange animation speed");
        Ok(())
    }

    // ===== Sales =====

    pub fn set_marker(&mut self, marker: MarkerShape) {
        self.sales.marker = marker;
        debug!(%marker, "set sales marker");
    }

    pub fn set_sales_color(&mut self, color: Color) {
        self.sales.color = color;
        debug!(%color, "set sales color");
    }

    // ===== Temperature =====

    pub fn set_font_size(&mut self, size: u32) -> Result<(), StateError> {
        self.temperature.font_size = check_range("font_size", size, FONT_SIZE_RANGE)?;
        debug!(size, "set temperature font size");
        Ok(())
    }

    pub fn set_font_style(&mut self, style: FontStyle) {
        self.temperature.font_style = style;
        debug!(%style, "set temperature font style");
    }

    // ===== Snowflake =====

    pub fn set_iterations(&mut self, iterations: u32) -> Result<(), StateError> {
        self.snowflake.iterations = check_range("iterations", iterations, ITERATION_RANGE)?;
        debug!(iterations, "set snowflake iterations");
        Ok(())
    }

    pub fn set_snowflake_color(&mut self, color: Color) {
        self.snowflake.color = color;
        debug!(%color, "set snowflake color");
    }

    // ===== Generic =====

    /// Restore the panel's default record.
    pub fn reset_to_default(&mut self, panel: PanelKey) {
        match panel {
            PanelKey::Book => self.book = BookConfig::default(),
            PanelKey::Exchange => self.exchange = ExchangeConfig::default(),
            PanelKey::Sales => self.sales = SalesConfig::default(),
            PanelKey::Temperature => self.temperature = TemperatureConfig::default(),
            PanelKey::Snowflake => self.snowflake = SnowflakeConfig::default(),
        }
        debug!(%panel, "reset panel to defaults");
    }

    /// Set one field from its textual value, e.g. `("exchange", "style", "dotted")`.
    pub fn set_field(&mut self, panel: PanelKey, field: &str, raw: &str) -> Result<(), StateError> {
        let invalid = || ValidationError::InvalidFieldValue {
            panel,
            field: field.to_string(),
            value: raw.to_string(),
        };
        let int = || -> Result<u32, ValidationError> {
            let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
            u32::try_from(value).map_err(|_| invalid())
        };

        match (panel, field) {
            (PanelKey::Book, "color1") => self.set_book_color(BookRegion::Region1, raw.parse()?),
            (PanelKey::Book, "color2") => self.set_book_color(BookRegion::Region2, raw.parse()?),
            (PanelKey::Book, "region1" | "region2") => return self.parse_and_set(panel, field, raw),
            (PanelKey::Exchange, "style") => self.set_line_style(raw.parse()?),
            (PanelKey::Exchange, "animation") => {
                self.set_animation_enabled(raw.trim().parse().map_err(|_| invalid())?)
            }
            (PanelKey::Exchange, "animation_speed") => self.set_animation_speed(int()?)?,
            (PanelKey::Sales, "marker") => self.set_marker(raw.parse()?),
            (PanelKey::Sales, "color") => self.set_sales_color(raw.parse()?),
            (PanelKey::Temperature, "font_size") => self.set_font_size(int()?)?,
            (PanelKey::Temperature, "font_style") => self.set_font_style(raw.parse()?),
            (PanelKey::Snowflake, "iterations") => self.set_iterations(int()?)?,
            (PanelKey::Snowflake, "color") => self.set_snowflake_color(raw.parse()?),
            _ => {
                return Err(ValidationError::UnknownField {
                    panel,
                    field: field.to_string(),
                }
                .into())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DEFAULT_REGION1, DEFAULT_REGION2};
    use proptest::prelude::*;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1e-9 * y.abs().max(1.0))
    }

    #[test]
    fn starts_with_defaults() {
        let store = ChartStateStore::new();
        assert_eq!(store.book().region1, DEFAULT_REGION1);
        assert_eq!(store.exchange().style, LineStyle::Solid);
        assert_eq!(store.sales().marker, MarkerShape::Diamond);
        assert_eq!(store.temperature().font_size, 12);
        assert_eq!(store.snowflake().iterations, 2);
        assert_eq!(store.snowflake().color.to_hex(), "#ff6b6b");
    }

    #[test]
    fn scale_multiplies_in_place() {
        let mut store = ChartStateStore::new();
        store.scale(PanelKey::Book, "region1", 1.1).unwrap();
        let expected: Vec<f64> = DEFAULT_REGION1.iter().map(|v| v * 1.1).collect();
        assert!(close(&store.book().region1, &expected));
        assert_eq!(store.book().region2, DEFAULT_REGION2);
    }

    #[test]
    fn scale_twice_equals_scale_by_square() {
        let mut twice = ChartStateStore::new();
        twice.scale(PanelKey::Book, "region1", 1.1).unwrap();
        twice.scale(PanelKey::Book, "region1", 1.1).unwrap();

        let mut once = ChartStateStore::new();
        once.scale(PanelKey::Book, "region1", 1.21).unwrap();

        assert!(close(&twice.book().region1, &once.book().region1));
    }

    #[test]
    fn scale_rejects_other_panels_and_bad_factors() {
        let mut store = ChartStateStore::new();
        assert!(store.scale(PanelKey::Sales, "region1", 1.1).is_err());
        assert!(store.scale(PanelKey::Book, "region3", 1.1).is_err());
        assert!(store.scale(PanelKey::Book, "region1", f64::NAN).is_err());
        assert!(store.scale(PanelKey::Book, "region1", -1.0).is_err());
        assert_eq!(store, ChartStateStore::new());
    }

    #[test]
    fn scale_overflow_leaves_series_unchanged() {
        let mut store = ChartStateStore::new();
        let err = store.scale_book(BookRegion::Region1, 1e306).unwrap_err();
        assert!(matches!(
            err,
            StateError::Validation(ValidationError::InvalidValue { position: 0, .. })
        ));
        assert_eq!(store.book().region1, DEFAULT_REGION1);
        assert!(store.book().region1.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn parse_and_set_fails_atomically() {
        let mut store = ChartStateStore::new();
        let err = store
            .parse_and_set(PanelKey::Book, "region1", "100,200,abc,300,400")
            .unwrap_err();
        assert_eq!(
            err,
            StateError::Parse(ParseError {
                token: "abc".into(),
                position: 2
            })
        );
        assert_eq!(store.book().region1, DEFAULT_REGION1);
    }

    #[test]
    fn parse_and_set_replaces_series() {
        let mut store = ChartStateStore::new();
        store
            .parse_and_set(PanelKey::Book, "region1", "100,200,300,400,500")
            .unwrap();
        assert_eq!(store.book().region1, [100.0, 200.0, 300.0, 400.0, 500.0]);

        store
            .parse_and_set(PanelKey::Book, "region2", " 1.5 , 2, 3,4 ,5")
            .unwrap();
        assert_eq!(store.book().region2, [1.5, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn parse_and_set_validates_shape_and_values() {
        let mut store = ChartStateStore::new();
        assert!(matches!(
            store.parse_and_set(PanelKey::Book, "region1", "1,2,3"),
            Err(StateError::Validation(ValidationError::LengthMismatch { found: 3, .. }))
        ));
        assert!(matches!(
            store.parse_and_set(PanelKey::Book, "region1", "1,2,,4,5"),
            Err(StateError::Parse(ParseError { position: 2, .. }))
        ));
        assert!(matches!(
            store.parse_and_set(PanelKey::Book, "region1", "1,2,-3,4,5"),
            Err(StateError::Validation(ValidationError::InvalidValue { position: 2, .. }))
        ));
        assert!(store.parse_and_set(PanelKey::Book, "region1", "1,2,inf,4,5").is_err());
        assert_eq!(store.book().region1, DEFAULT_REGION1);
    }

    #[test]
    fn parse_and_set_book_is_all_or_nothing() {
        let mut store = ChartStateStore::new();
        assert!(store
            .parse_and_set_book("1,2,3,4,5", "6,7,x,9,10")
            .is_err());
        assert_eq!(store.book().region1, DEFAULT_REGION1);
        assert_eq!(store.book().region2, DEFAULT_REGION2);

        store.parse_and_set_book("1,2,3,4,5", "6,7,8,9,10").unwrap();
        assert_eq!(store.book().region2, [6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn reset_restores_exact_defaults() {
        let mut store = ChartStateStore::new();
        store.scale(PanelKey::Book, "region1", 1.1).unwrap();
        store.scale(PanelKey::Book, "region2", 1.1).unwrap();
        store
            .parse_and_set(PanelKey::Book, "region1", "1,2,3,4,5")
            .unwrap();
        store.set_book_color(BookRegion::Region1, Color::rgb(0, 0, 0));

        store.reset_to_default(PanelKey::Book);
        assert_eq!(store.book().region1, [1200.0, 2400.0, 1800.0, 2200.0, 1600.0]);
        assert_eq!(store.book().region2, [1050.0, 2100.0, 1300.0, 1600.0, 1340.0]);
        assert_eq!(store.book(), &BookConfig::default());
    }

    #[test]
    fn bounded_setters_reject_out_of_range() {
        let mut store = ChartStateStore::new();
        assert!(store.set_iterations(7).is_err());
        assert!(store.set_font_size(0).is_err());
        assert!(store.set_font_size(33).is_err());
        assert!(store.set_animation_speed(0).is_err());
        assert_eq!(store, ChartStateStore::new());

        store.set_iterations(6).unwrap();
        store.set_font_size(20).unwrap();
        assert_eq!(store.snowflake().iterations, 6);
        assert_eq!(store.temperature().font_size, 20);
    }

    #[test]
    fn toggle_animation_flips() {
        let mut store = ChartStateStore::new();
        assert!(store.toggle_animation());
        assert!(!store.toggle_animation());
    }

    #[test]
    fn set_field_dispatches_and_validates() {
        let mut store = ChartStateStore::new();
        store.set_field(PanelKey::Exchange, "style", "dotted").unwrap();
        store.set_field(PanelKey::Sales, "marker", "square").unwrap();
        store.set_field(PanelKey::Sales, "color", "#d62728").unwrap();
        store.set_field(PanelKey::Snowflake, "iterations", "4").unwrap();
        store.set_field(PanelKey::Temperature, "font_style", "italic").unwrap();
        store.set_field(PanelKey::Exchange, "animation", "true").unwrap();

        assert_eq!(store.exchange().style, LineStyle::Dotted);
        assert!(store.exchange().animation);
        assert_eq!(store.sales().marker, MarkerShape::Square);
        assert_eq!(store.sales().color, Color::rgb(0xd6, 0x27, 0x28));
        assert_eq!(store.snowflake().iterations, 4);
        assert_eq!(store.temperature().font_style, FontStyle::Italic);

        let before = store.clone();
        assert!(store.set_field(PanelKey::Exchange, "style", "wavy").is_err());
        assert!(store.set_field(PanelKey::Sales, "color", "not-a-color").is_err());
        assert!(store.set_field(PanelKey::Snowflake, "iterations", "-1").is_err());
        assert!(store.set_field(PanelKey::Snowflake, "iterations", "99").is_err());
        assert!(store.set_field(PanelKey::Snowflake, "depth", "1").is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn get_returns_matching_record() {
        let store = ChartStateStore::new();
        for key in PanelKey::ALL {
            assert_eq!(store.get(key), PanelConfig::default_for(key));
        }
    }

    proptest! {
        #[test]
        fn scale_preserves_length_and_order(factor in 0.0f64..10.0) {
            let mut store = ChartStateStore::new();
            store.scale_book(BookRegion::Region2, factor).unwrap();
            let scaled = store.book().region2;
            for (i, v) in scaled.iter().enumerate() {
                prop_assert!((v - DEFAULT_REGION2[i] * factor).abs() < 1e-6);
            }
        }

        #[test]
        fn bad_token_never_mutates(pos in 0usize..5, junk in "[a-z]{1,4}") {
            let mut store = ChartStateStore::new();
            let mut tokens = vec!["1".to_string(); 5];
            tokens[pos] = junk;
            prop_assert!(store.parse_and_set(PanelKey::Book, "region1", &tokens.join(",")).is_err());
            prop_assert_eq!(store.book().region1, DEFAULT_REGION1);
        }
    }
}
