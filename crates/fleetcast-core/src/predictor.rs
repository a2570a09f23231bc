//! Regression models the artifact ships.
//!
//! [`Predictor`] is the seam between the forecast pipeline and whatever
//! produced the base-year numbers. The artifact stores its two models as
//! [`RegressionModel`] values so they can be evaluated without the training
//! toolchain.

use serde::{Deserialize, Serialize};

use crate::encoder::{EncodedVector, FEATURE_COUNT};
use crate::error::{ForecastError, Result};

/// Base-year regression: deterministic, no side effects.
pub trait Predictor {
    fn predict(&self, features: &EncodedVector) -> f64;
}

impl<F> Predictor for F
where
    F: Fn(&EncodedVector) -> f64,
{
    fn predict(&self, features: &EncodedVector) -> f64 {
        self(features)
    }
}

/// One node of a flattened decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    #[must_use]
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children must point forward, so a validated tree always terminates.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ForecastError::artifact("decision tree has no nodes"));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(ForecastError::artifact(format!(
                            "node {idx} splits on feature {feature}, expected < {FEATURE_COUNT}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ForecastError::artifact(format!(
                            "node {idx} has a non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ForecastError::artifact(format!(
                                "node {idx} has invalid child index {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ForecastError::artifact(format!(
                            "leaf {idx} has a non-finite value"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`.
    ///
    /// A tree that failed [`Self::validate`] evaluates to 0 instead of
    /// looping or panicking.
    #[must_use]
    pub fn evaluate(&self, features: &EncodedVector) -> f64 {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(&x) = features.as_slice().get(*feature) else {
                        return 0.0;
                    };
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Averaging ensemble.
    Forest { trees: Vec<DecisionTree> },
    /// Additive ensemble: `init + learning_rate * Σ tree`.
    Boosted {
        init: f64,
        learning_rate: f64,
        trees: Vec<DecisionTree>,
    },
}

impl RegressionModel {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Forest { .. } => "forest",
            Self::Boosted { .. } => "boosted",
        }
    }

    /// Short human description, e.g. `forest (120 trees)`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Linear { coefficients, .. } => {
                format!("linear ({} coefficients)", coefficients.len())
            }
            Self::Forest { trees } => format!("forest ({} trees)", trees.len()),
            Self::Boosted { trees, .. } => format!("boosted ({} trees)", trees.len()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(ForecastError::artifact(format!(
                        "linear model has {} coefficients, expected {FEATURE_COUNT}",
                        coefficients.len()
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ForecastError::artifact(
                        "linear model has non-finite parameters",
                    ));
                }
                Ok(())
            }
            Self::Forest { trees } => validate_trees(trees),
            Self::Boosted {
                init,
                learning_rate,
                trees,
            } => {
                if !init.is_finite() || !learning_rate.is_finite() {
                    return Err(ForecastError::artifact(
                        "boosted model has non-finite parameters",
                    ));
                }
                validate_trees(trees)
            }
        }
    }
}

fn validate_trees(trees: &[DecisionTree]) -> Result<()> {
    if trees.is_empty() {
        return Err(ForecastError::artifact("tree ensemble has no trees"));
    }
    trees.iter().try_for_each(DecisionTree::validate)
}

impl Predictor for RegressionModel {
    fn predict(&self, features: &EncodedVector) -> f64 {
        match self {
            Self::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(features.as_slice())
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            Self::Forest { trees } => {
                if trees.is_empty() {
                    return 0.0;
                }
                let total: f64 = trees.iter().map(|tree| tree.evaluate(features)).sum();
                total / trees.len() as f64
            }
            Self::Boosted {
                init,
                learning_rate,
                trees,
            } => {
                init + learning_rate
                    * trees
                        .iter()
                        .map(|tree| tree.evaluate(features))
                        .sum::<f64>()
            }
        }
    }
}
