//! Selection → feature vector encoding.
//!
//! The vector layout is fixed by the trained models:
//!
//! ```text
//! [engine_size, age, mileage, model_code, region_code,
//!  is_diesel, is_electric, is_hybrid, is_petrol, is_automatic, is_manual]
//! ```
//!
//! `age` and `mileage` are always zero: every forecast describes a new
//! vehicle in the base year.

use std::ops::Index;

use serde::Serialize;

use crate::artifact::CodeTable;
use crate::error::{LookupTable, Result};
use crate::inputs::ForecastInputs;

pub const FEATURE_COUNT: usize = 11;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "engine_size",
    "age",
    "mileage",
    "model_code",
    "region_code",
    "is_diesel",
    "is_electric",
    "is_hybrid",
    "is_petrol",
    "is_automatic",
    "is_manual",
];

const FUEL_OFFSET: usize = 5;
const TRANSMISSION_OFFSET: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EncodedVector([f64; FEATURE_COUNT]);

impl EncodedVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn into_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Feature value by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.0[idx])
    }

    #[must_use]
    pub fn fuel_flags(&self) -> &[f64] {
        &self.0[FUEL_OFFSET..FUEL_OFFSET + 4]
    }

    #[must_use]
    pub fn transmission_flags(&self) -> &[f64] {
        &self.0[TRANSMISSION_OFFSET..TRANSMISSION_OFFSET + 2]
    }

    /// Named `(column, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl Index<usize> for EncodedVector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

/// Encodes selections against the artifact's model and region tables.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    model_codes: &'a CodeTable,
    region_codes: &'a CodeTable,
}

impl<'a> FeatureEncoder<'a> {
    #[must_use]
    pub fn new(model_codes: &'a CodeTable, region_codes: &'a CodeTable) -> Self {
        Self {
            model_codes,
            region_codes,
        }
    }

    /// Build the feature vector, failing before any prediction if the model
    /// or region is not in its table.
    pub fn encode(&self, inputs: &ForecastInputs) -> Result<EncodedVector> {
        let model_code = self.model_codes.code(LookupTable::Model, inputs.model_name())?;
        let region_code = self.region_codes.code(LookupTable::Region, inputs.region())?;

        let mut features = [0.0; FEATURE_COUNT];
        features[0] = inputs.engine_size().liters();
        // [1] age and [2] mileage stay at zero.
        features[3] = model_code as f64;
        features[4] = region_code as f64;
        features[FUEL_OFFSET..FUEL_OFFSET + 4].copy_from_slice(&inputs.fuel().one_hot());
        features[TRANSMISSION_OFFSET..TRANSMISSION_OFFSET + 2]
            .copy_from_slice(&inputs.transmission().one_hot());

        tracing::debug!(
            target: "fleetcast.encode",
            model = %inputs.model_name(),
            region = %inputs.region(),
            model_code,
            region_code,
            "encoded selections"
        );

        Ok(EncodedVector(features))
    }
}
