//! The immutable context a submission runs against.
//!
//! A [`ForecastContext`] is built once at startup from the loaded artifact
//! and the growth table, then shared read-only. Every call to
//! [`ForecastContext::forecast`] is independent.

use std::fmt;

use serde::Serialize;

use crate::artifact::{ArtifactBundle, CodeTable};
use crate::encoder::{EncodedVector, FeatureEncoder};
use crate::error::Result;
use crate::growth::{GrowthRate, GrowthTable};
use crate::inputs::{ForecastInputs, ForecastYear};
use crate::predictor::Predictor;
use crate::projector::{BasePrediction, ForecastResult, Projection, project};

type SharedPredictor = Box<dyn Predictor + Send + Sync>;

pub struct ForecastContext {
    model_codes: CodeTable,
    region_codes: CodeTable,
    volume_model: SharedPredictor,
    revenue_model: SharedPredictor,
    growth: GrowthTable,
}

impl fmt::Debug for ForecastContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastContext")
            .field("models", &self.model_codes.len())
            .field("regions", &self.region_codes.len())
            .field("growth", &self.growth)
            .finish_non_exhaustive()
    }
}

/// Everything one submission produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub inputs: ForecastInputs,
    pub features: EncodedVector,
    pub base: BasePrediction,
    pub growth: GrowthRate,
    pub projection: Projection,
    pub result: ForecastResult,
}

impl ForecastContext {
    pub fn new<V, R>(
        model_codes: CodeTable,
        region_codes: CodeTable,
        volume_model: V,
        revenue_model: R,
        growth: GrowthTable,
    ) -> Self
    where
        V: Predictor + Send + Sync + 'static,
        R: Predictor + Send + Sync + 'static,
    {
        Self {
            model_codes,
            region_codes,
            volume_model: Box::new(volume_model),
            revenue_model: Box::new(revenue_model),
            growth,
        }
    }

    #[must_use]
    pub fn from_bundle(bundle: &ArtifactBundle, growth: GrowthTable) -> Self {
        Self::new(
            bundle.model_encoder.clone(),
            bundle.region_encoder.clone(),
            bundle.vol_model.clone(),
            bundle.rev_model.clone(),
            growth,
        )
    }

    #[must_use]
    pub fn model_codes(&self) -> &CodeTable {
        &self.model_codes
    }

    #[must_use]
    pub fn region_codes(&self) -> &CodeTable {
        &self.region_codes
    }

    #[must_use]
    pub fn growth(&self) -> &GrowthTable {
        &self.growth
    }

    /// Encode, predict the base year, and project to `inputs.year()`.
    ///
    /// Unknown model or region names fail before either model is called.
    pub fn forecast(&self, inputs: &ForecastInputs) -> Result<Forecast> {
        let _span = tracing::debug_span!(
            "forecast",
            model = %inputs.model_name(),
            region = %inputs.region(),
            year = inputs.year().get(),
        )
        .entered();

        let features = self.encoder().encode(inputs)?;
        let base = self.predict_base(&features);
        Ok(self.project_for(inputs.clone(), features, base))
    }

    /// Forecasts for every selectable year, sharing one encode and one
    /// prediction. `inputs.year()` is ignored.
    pub fn trend(&self, inputs: &ForecastInputs) -> Result<Vec<Forecast>> {
        let _span = tracing::debug_span!(
            "forecast.trend",
            model = %inputs.model_name(),
            region = %inputs.region(),
        )
        .entered();

        let features = self.encoder().encode(inputs)?;
        let base = self.predict_base(&features);
        Ok(ForecastYear::all()
            .map(|year| self.project_for(inputs.with_year(year), features, base))
            .collect())
    }

    fn encoder(&self) -> FeatureEncoder<'_> {
        FeatureEncoder::new(&self.model_codes, &self.region_codes)
    }

    fn predict_base(&self, features: &EncodedVector) -> BasePrediction {
        let base = BasePrediction {
            volume: self.volume_model.predict(features),
            revenue: self.revenue_model.predict(features),
        };
        tracing::debug!(
            target: "fleetcast.predict",
            volume = base.volume,
            revenue = base.revenue,
            "base-year prediction"
        );
        base
    }

    fn project_for(
        &self,
        inputs: ForecastInputs,
        features: EncodedVector,
        base: BasePrediction,
    ) -> Forecast {
        let growth = self.growth.rate_for(inputs.region());
        let projection = project(base, inputs.year(), growth.multiplier());
        let result = projection.result();
        Forecast {
            inputs,
            features,
            base,
            growth,
            projection,
            result,
        }
    }
}
