#![forbid(unsafe_code)]

//! Core: feature encoding, regression evaluation, and growth projection.
//!
//! # Role in fleetcast
//! `fleetcast-core` owns everything that turns a set of form selections into
//! a forecast. It has no terminal or CLI knowledge; the `fleetcast` binary
//! drives it.
//!
//! # Primary responsibilities
//! - **ForecastInputs**: validated per-request selections.
//! - **FeatureEncoder**: fixed-order 11-field [`EncodedVector`].
//! - **Predictor**: the model seam, with serialisable [`RegressionModel`]s.
//! - **Artifact**: load-time integrity checks of the model bundle.
//! - **Projector**: compounding a base-year prediction by regional growth.
//! - **ForecastContext**: the immutable context a submission runs against.
//!
//! # Pipeline
//! ```text
//! ForecastInputs -> encode -> predict (volume, revenue) -> project -> ForecastResult
//! ```

pub mod artifact;
pub mod context;
pub mod encoder;
pub mod error;
pub mod format;
pub mod growth;
pub mod inputs;
pub mod predictor;
pub mod projector;

pub use artifact::{Artifact, ArtifactBundle, CodeTable, Palette};
pub use context::{Forecast, ForecastContext};
pub use encoder::{EncodedVector, FEATURE_COUNT, FEATURE_NAMES, FeatureEncoder};
pub use error::{ForecastError, LookupTable, Result};
pub use growth::{DEFAULT_GROWTH_MULTIPLIER, GrowthRate, GrowthTable};
pub use inputs::{BASE_YEAR, EngineSize, ForecastInputs, ForecastYear, Fuel, Transmission};
pub use predictor::{DecisionTree, Predictor, RegressionModel, TreeNode};
pub use projector::{BasePrediction, ForecastResult, Projection, project};
