//! Base-year → target-year compounding.

use serde::Serialize;

use crate::inputs::ForecastYear;

/// Raw model outputs for the base year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasePrediction {
    pub volume: f64,
    pub revenue: f64,
}

/// Unclamped projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub year: ForecastYear,
    pub years_ahead: u32,
    pub multiplier: f64,
    pub volume: f64,
    pub revenue: f64,
}

/// What gets displayed: both values floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastResult {
    pub volume: u64,
    pub revenue: f64,
}

/// `value * multiplier ^ years_ahead` for both predictions.
///
/// With `years_ahead == 0` the base values come back unchanged.
#[must_use]
pub fn project(base: BasePrediction, year: ForecastYear, multiplier: f64) -> Projection {
    let years_ahead = year.years_ahead();
    let factor = if years_ahead == 0 {
        1.0
    } else {
        // years_ahead <= 5, always fits.
        multiplier.powi(years_ahead as i32)
    };

    let projection = Projection {
        year,
        years_ahead,
        multiplier,
        volume: base.volume * factor,
        revenue: base.revenue * factor,
    };

    tracing::debug!(
        target: "fleetcast.project",
        year = year.get(),
        years_ahead,
        multiplier,
        factor,
        volume = projection.volume,
        revenue = projection.revenue,
        "projected base prediction"
    );

    projection
}

impl Projection {
    /// Clamp to displayable values. Volume truncates toward zero before
    /// flooring; NaN reports as 0.
    #[must_use]
    pub fn result(&self) -> ForecastResult {
        ForecastResult {
            // Saturating float→int cast: negatives and NaN become 0.
            volume: self.volume.trunc() as u64,
            revenue: if self.revenue > 0.0 { self.revenue } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(y: i64) -> ForecastYear {
        ForecastYear::new(y).unwrap()
    }

    #[test]
    fn base_year_is_identity() {
        let base = BasePrediction {
            volume: 1234.567,
            revenue: 98765.4321,
        };
        let projection = project(base, ForecastYear::BASE, 1.028);
        assert_eq!(projection.years_ahead, 0);
        assert_eq!(projection.volume, base.volume);
        assert_eq!(projection.revenue, base.revenue);
    }

    #[test]
    fn europe_2027_compounds_twice() {
        let base = BasePrediction {
            volume: 10_000.0,
            revenue: 500_000.0,
        };
        let projection = project(base, year(2027), 1.012);
        assert_eq!(projection.years_ahead, 2);
        assert!((projection.volume - 10_241.44).abs() < 1e-6);
        assert!((projection.revenue - 512_072.0).abs() < 1e-6);
        assert_eq!(projection.result().volume, 10_241);
    }

    #[test]
    fn negative_predictions_clamp_to_zero() {
        let base = BasePrediction {
            volume: -42.9,
            revenue: -1.0,
        };
        let result = project(base, year(2030), 1.018).result();
        assert_eq!(result.volume, 0);
        assert_eq!(result.revenue, 0.0);
    }

    #[test]
    fn nan_predictions_report_as_zero() {
        let base = BasePrediction {
            volume: f64::NAN,
            revenue: f64::NAN,
        };
        let result = project(base, year(2026), 1.01).result();
        assert_eq!(result.volume, 0);
        assert_eq!(result.revenue, 0.0);
    }

    #[test]
    fn volume_truncates_toward_zero() {
        let base = BasePrediction {
            volume: 99.99,
            revenue: 0.4,
        };
        let result = project(base, ForecastYear::BASE, 1.5).result();
        assert_eq!(result.volume, 99);
        assert_eq!(result.revenue, 0.4);
    }
}
