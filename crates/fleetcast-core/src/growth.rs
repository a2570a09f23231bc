//! Regional annual growth multipliers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ForecastError, Result};

/// Multiplier used for regions the table does not list.
pub const DEFAULT_GROWTH_MULTIPLIER: f64 = 1.01;

const DEFAULT_RATES: [(&str, f64); 6] = [
    ("Africa", 1.015),
    ("Asia", 1.028),
    ("Europe", 1.012),
    ("Middle East", 1.025),
    ("North America", 1.018),
    ("South America", 1.010),
];

/// Outcome of a growth lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GrowthRate {
    Listed { multiplier: f64 },
    Fallback { multiplier: f64 },
}

impl GrowthRate {
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Listed { multiplier } | Self::Fallback { multiplier } => multiplier,
        }
    }

    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Region → annual multiplier. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthTable {
    rates: BTreeMap<String, f64>,
}

impl Default for GrowthTable {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES
                .iter()
                .map(|(region, rate)| ((*region).to_string(), *rate))
                .collect(),
        }
    }
}

impl GrowthTable {
    /// A table with no regions; every lookup falls back.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rates: BTreeMap::new(),
        }
    }

    /// Builder-style insert or replace. Multipliers must be finite and > 0.
    pub fn with_rate(mut self, region: impl Into<String>, multiplier: f64) -> Result<Self> {
        let region = region.into();
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ForecastError::InvalidGrowthRate {
                region,
                value: multiplier,
            });
        }
        self.rates.insert(region, multiplier);
        Ok(self)
    }

    /// Multiplier for `region`, falling back to [`DEFAULT_GROWTH_MULTIPLIER`].
    #[must_use]
    pub fn rate_for(&self, region: &str) -> GrowthRate {
        match self.rates.get(region) {
            Some(&multiplier) => GrowthRate::Listed { multiplier },
            None => {
                tracing::warn!(
                    target: "fleetcast.growth",
                    region = %region,
                    multiplier = DEFAULT_GROWTH_MULTIPLIER,
                    "no growth rate for region, using default"
                );
                GrowthRate::Fallback {
                    multiplier: DEFAULT_GROWTH_MULTIPLIER,
                }
            }
        }
    }

    #[must_use]
    pub fn multiplier_for(&self, region: &str) -> f64 {
        self.rate_for(region).multiplier()
    }

    #[must_use]
    pub fn contains(&self, region: &str) -> bool {
        self.rates.contains_key(region)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(region, rate)| (region.as_str(), *rate))
    }

    /// True when `region` differs from the built-in table.
    #[must_use]
    pub fn is_override(&self, region: &str) -> bool {
        let builtin = DEFAULT_RATES
            .iter()
            .find(|(name, _)| *name == region)
            .map(|(_, rate)| *rate);
        match (self.rates.get(region), builtin) {
            (Some(current), Some(default)) => *current != default,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_lists_six_regions() {
        let table = GrowthTable::default();
        assert_eq!(table.iter().count(), 6);
        assert_eq!(table.multiplier_for("Europe"), 1.012);
        assert_eq!(table.multiplier_for("Asia"), 1.028);
        assert_eq!(table.multiplier_for("South America"), 1.010);
    }

    #[test]
    fn unknown_region_falls_back_without_error() {
        let table = GrowthTable::default();
        let rate = table.rate_for("Antarctica");
        assert!(rate.is_fallback());
        assert_eq!(rate.multiplier(), DEFAULT_GROWTH_MULTIPLIER);
        assert_eq!(GrowthTable::empty().multiplier_for("Europe"), 1.01);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let table = GrowthTable::default()
            .with_rate("Europe", 1.02)
            .unwrap()
            .with_rate("Oceania", 1.03)
            .unwrap();
        assert_eq!(table.multiplier_for("Europe"), 1.02);
        assert!(table.is_override("Europe"));
        assert!(table.is_override("Oceania"));
        assert!(!table.is_override("Asia"));
        assert!(!table.rate_for("Oceania").is_fallback());
    }

    #[test]
    fn non_positive_or_non_finite_rates_are_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let error = GrowthTable::default().with_rate("Asia", bad).unwrap_err();
            assert!(matches!(error, ForecastError::InvalidGrowthRate { .. }));
        }
    }
}
