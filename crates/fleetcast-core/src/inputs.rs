//! Per-request form selections.
//!
//! Every enumerated field is a closed type: a value that made it into
//! [`ForecastInputs`] is one of the choices the form offers. Only the model
//! and region names are open strings, because their domain comes from the
//! loaded artifact.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ForecastError, Result};

/// Year the models were trained to predict. Projections compound from here.
pub const BASE_YEAR: u16 = 2025;

/// Last selectable forecast year.
pub const LAST_YEAR: u16 = 2030;

/// A forecast year in `2025..=2030`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ForecastYear(u16);

impl ForecastYear {
    pub const BASE: Self = Self(BASE_YEAR);

    pub fn new(year: i64) -> Result<Self> {
        if (i64::from(BASE_YEAR)..=i64::from(LAST_YEAR)).contains(&year) {
            // Range check above keeps the cast lossless.
            Ok(Self(year as u16))
        } else {
            Err(ForecastError::InvalidYear { year })
        }
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Elapsed years since [`BASE_YEAR`]; never negative.
    #[must_use]
    pub const fn years_ahead(self) -> u32 {
        (self.0 - BASE_YEAR) as u32
    }

    /// All selectable years in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (BASE_YEAR..=LAST_YEAR).map(Self)
    }

    /// The year before this one, unless this is the base year.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        (self.0 > BASE_YEAR).then(|| Self(self.0 - 1))
    }
}

impl fmt::Display for ForecastYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ForecastYear {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        let year = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ForecastError::NotANumber {
                field: "forecast year",
                raw: raw.to_string(),
            })?;
        Self::new(year)
    }
}

const ENGINE_TENTHS: [u8; 7] = [15, 20, 25, 30, 35, 44, 60];

/// Engine displacement, restricted to the sizes the form offers.
///
/// Stored in tenths of a litre so equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineSize(u8);

impl EngineSize {
    pub fn from_liters(liters: f64) -> Result<Self> {
        let scaled = liters * 10.0;
        let rounded = scaled.round();
        if liters.is_finite() && (scaled - rounded).abs() < 1e-6 {
            let tenths = rounded as i64;
            if let Some(&hit) = ENGINE_TENTHS.iter().find(|&&t| i64::from(t) == tenths) {
                return Ok(Self(hit));
            }
        }
        Err(ForecastError::InvalidEngineSize { liters })
    }

    #[must_use]
    pub fn liters(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        ENGINE_TENTHS.into_iter().map(Self)
    }
}

impl fmt::Display for EngineSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.liters())
    }
}

impl FromStr for EngineSize {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        let liters = raw
            .trim()
            .trim_end_matches(['L', 'l'])
            .trim()
            .parse::<f64>()
            .map_err(|_| ForecastError::NotANumber {
                field: "engine size",
                raw: raw.to_string(),
            })?;
        Self::from_liters(liters)
    }
}

impl Serialize for EngineSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.liters())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fuel {
    Electric,
    Hybrid,
    Petrol,
    Diesel,
}

impl Fuel {
    /// Form order.
    pub const ALL: [Self; 4] = [Self::Electric, Self::Hybrid, Self::Petrol, Self::Diesel];

    /// Flags in `(diesel, electric, hybrid, petrol)` order.
    #[must_use]
    pub const fn one_hot(self) -> [f64; 4] {
        match self {
            Self::Diesel => [1.0, 0.0, 0.0, 0.0],
            Self::Electric => [0.0, 1.0, 0.0, 0.0],
            Self::Hybrid => [0.0, 0.0, 1.0, 0.0],
            Self::Petrol => [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
        }
    }
}

impl fmt::Display for Fuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fuel {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|fuel| fuel.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ForecastError::UnknownFuel {
                value: raw.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub const ALL: [Self; 2] = [Self::Automatic, Self::Manual];

    /// Flags in `(automatic, manual)` order.
    #[must_use]
    pub const fn one_hot(self) -> [f64; 2] {
        match self {
            Self::Automatic => [1.0, 0.0],
            Self::Manual => [0.0, 1.0],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Manual => "Manual",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transmission {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ForecastError::UnknownTransmission {
                value: raw.to_string(),
            })
    }
}

/// One form submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastInputs {
    model_name: String,
    region: String,
    year: ForecastYear,
    fuel: Fuel,
    transmission: Transmission,
    engine_size: EngineSize,
}

impl ForecastInputs {
    #[must_use]
    pub fn new(
        model_name: impl Into<String>,
        region: impl Into<String>,
        year: ForecastYear,
        fuel: Fuel,
        transmission: Transmission,
        engine_size: EngineSize,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            region: region.into(),
            year,
            fuel,
            transmission,
            engine_size,
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn year(&self) -> ForecastYear {
        self.year
    }

    #[must_use]
    pub fn fuel(&self) -> Fuel {
        self.fuel
    }

    #[must_use]
    pub fn transmission(&self) -> Transmission {
        self.transmission
    }

    #[must_use]
    pub fn engine_size(&self) -> EngineSize {
        self.engine_size
    }

    /// Same selections, different target year.
    #[must_use]
    pub fn with_year(&self, year: ForecastYear) -> Self {
        Self {
            year,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds_are_inclusive() {
        assert_eq!(ForecastYear::new(2025).unwrap().years_ahead(), 0);
        assert_eq!(ForecastYear::new(2030).unwrap().years_ahead(), 5);
        assert!(matches!(
            ForecastYear::new(2024),
            Err(ForecastError::InvalidYear { year: 2024 })
        ));
        assert!(ForecastYear::new(2031).is_err());
    }

    #[test]
    fn year_iteration_covers_form_choices() {
        let years: Vec<u16> = ForecastYear::all().map(ForecastYear::get).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029, 2030]);
        assert_eq!(ForecastYear::BASE.previous(), None);
        assert_eq!(
            ForecastYear::new(2027).unwrap().previous(),
            Some(ForecastYear::new(2026).unwrap())
        );
    }

    #[test]
    fn engine_size_accepts_only_offered_values() {
        assert_eq!(EngineSize::from_liters(4.4).unwrap().liters(), 4.4);
        assert_eq!("3.0".parse::<EngineSize>().unwrap().liters(), 3.0);
        assert_eq!("2.5L".parse::<EngineSize>().unwrap().to_string(), "2.5");
        assert!(EngineSize::from_liters(4.0).is_err());
        assert!(EngineSize::from_liters(f64::NAN).is_err());
        assert_eq!(EngineSize::all().count(), 7);
    }

    #[test]
    fn non_numeric_text_is_echoed_back() {
        let error = "abc".parse::<ForecastYear>().unwrap_err();
        assert_eq!(error.to_string(), "forecast year is not a number: \"abc\"");
        assert!(error.is_input_error());

        let error = "big".parse::<EngineSize>().unwrap_err();
        assert!(matches!(
            &error,
            ForecastError::NotANumber { field: "engine size", raw } if raw == "big"
        ));
        assert_eq!(error.to_string(), "engine size is not a number: \"big\"");

        // Numeric but out of range keeps the range error.
        assert!(matches!(
            "2040".parse::<ForecastYear>(),
            Err(ForecastError::InvalidYear { year: 2040 })
        ));
    }

    #[test]
    fn fuel_and_transmission_parse_case_insensitively() {
        assert_eq!("electric".parse::<Fuel>().unwrap(), Fuel::Electric);
        assert_eq!(" DIESEL ".parse::<Fuel>().unwrap(), Fuel::Diesel);
        assert!(matches!(
            "Hydrogen".parse::<Fuel>(),
            Err(ForecastError::UnknownFuel { value }) if value == "Hydrogen"
        ));
        assert_eq!("manual".parse::<Transmission>().unwrap(), Transmission::Manual);
        assert!("CVT".parse::<Transmission>().is_err());
    }

    #[test]
    fn one_hot_has_single_flag() {
        for fuel in Fuel::ALL {
            assert_eq!(fuel.one_hot().iter().sum::<f64>(), 1.0, "{fuel}");
        }
        for transmission in Transmission::ALL {
            assert_eq!(transmission.one_hot().iter().sum::<f64>(), 1.0);
        }
        assert_eq!(Fuel::Hybrid.one_hot(), [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn with_year_keeps_other_selections() {
        let inputs = ForecastInputs::new(
            "X5",
            "Europe",
            ForecastYear::BASE,
            Fuel::Electric,
            Transmission::Automatic,
            EngineSize::from_liters(3.0).unwrap(),
        );
        let later = inputs.with_year(ForecastYear::new(2029).unwrap());
        assert_eq!(later.model_name(), "X5");
        assert_eq!(later.year().get(), 2029);
        assert_eq!(inputs.year(), ForecastYear::BASE);
    }
}
