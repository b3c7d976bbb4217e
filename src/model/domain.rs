//! Model store capabilities and the artefact formats backing them.
//!
//! The gateway only ever sees two trait objects: a [`FeatureScaler`] and a
//! [`PriceEstimator`]. Both are fitted elsewhere and are read-only here, so
//! one loaded instance is shared by every request without locking.

use serde::Deserialize;

use crate::common::error::{InferenceError, InferenceResult, StoreError, StoreResult};

/// Pre-fitted column transform applied before prediction.
pub trait FeatureScaler: Send + Sync {
    /// Width the scaler was fitted on.
    fn n_features(&self) -> usize;
    fn transform(&self, features: &[f64]) -> InferenceResult<Vec<f64>>;
}

/// Pre-fitted regressor returning a price in lakhs.
pub trait PriceEstimator: Send + Sync {
    fn n_features(&self) -> usize;
    fn predict(&self, features: &[f64]) -> InferenceResult<f64>;
    /// Short human readable summary for start-up logs.
    fn describe(&self) -> String;
}

/// Loader contract for the two capabilities.
pub trait ModelStore {
    fn load_scaler(&self) -> StoreResult<Box<dyn FeatureScaler>>;
    fn load_estimator(&self) -> StoreResult<Box<dyn PriceEstimator>>;
}

fn check_width(stage: &'static str, expected: usize, actual: usize) -> InferenceResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(InferenceError::DimensionMismatch {
            stage,
            expected,
            actual,
        })
    }
}

/// Persisted scaler artefact.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtefact {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

impl ScalerArtefact {
    pub fn into_scaler(self) -> StoreResult<Box<dyn FeatureScaler>> {
        match self {
            ScalerArtefact::Standard { mean, scale } => {
                Ok(Box::new(StandardScaler::new(mean, scale)?))
            }
        }
    }
}

/// Zero-mean / unit-variance scaling with per-column statistics.
#[derive(Clone, Debug)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> StoreResult<Self> {
        if mean.is_empty() || mean.len() != scale.len() {
            return Err(StoreError::Invalid(format!(
                "scaler mean/scale lengths disagree: {} vs {}",
                mean.len(),
                scale.len()
            )));
        }
        // Constant columns are stored with a zero scale; they pass through unscaled.
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { mean, scale })
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> InferenceResult<Vec<f64>> {
        check_width("scaler", self.n_features(), features.len())?;
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}

/// Persisted estimator artefact.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorArtefact {
    RandomForest {
        n_features: usize,
        trees: Vec<TreeArtefact>,
    },
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl EstimatorArtefact {
    pub fn into_estimator(self) -> StoreResult<Box<dyn PriceEstimator>> {
        match self {
            EstimatorArtefact::RandomForest { n_features, trees } => {
                Ok(Box::new(ForestRegressor::new(n_features, trees)?))
            }
            EstimatorArtefact::Linear {
                coefficients,
                intercept,
            } => Ok(Box::new(LinearRegressor::new(coefficients, intercept)?)),
        }
    }
}

/// One regression tree as a flat node array; node 0 is the root.
#[derive(Clone, Debug, Deserialize)]
pub struct TreeArtefact {
    pub nodes: Vec<NodeArtefact>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeArtefact {
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

/// Averaging tree ensemble. A sample goes left when `x <= threshold`.
#[derive(Clone, Debug)]
pub struct ForestRegressor {
    n_features: usize,
    trees: Vec<Vec<NodeArtefact>>,
}

impl ForestRegressor {
    pub fn new(n_features: usize, trees: Vec<TreeArtefact>) -> StoreResult<Self> {
        if trees.is_empty() {
            return Err(StoreError::Invalid("forest has no trees".to_string()));
        }
        for (t, tree) in trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(StoreError::Invalid(format!("tree {t} has no nodes")));
            }
            for (idx, node) in tree.nodes.iter().enumerate() {
                if let NodeArtefact::Split {
                    feature,
                    left,
                    right,
                    ..
                } = *node
                {
                    // Children must come after their parent; this also rules out cycles.
                    let in_range = |child: usize| child > idx && child < tree.nodes.len();
                    if feature >= n_features || !in_range(left) || !in_range(right) {
                        return Err(StoreError::Invalid(format!(
                            "tree {t} node {idx} is malformed"
                        )));
                    }
                }
            }
        }
        Ok(Self {
            n_features,
            trees: trees.into_iter().map(|t| t.nodes).collect(),
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_tree(nodes: &[NodeArtefact], features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match nodes[idx] {
                NodeArtefact::Leaf { value } => return value,
                NodeArtefact::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl PriceEstimator for ForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
        check_width("estimator", self.n_features, features.len())?;
        let sum: f64 = self
            .trees
            .iter()
            .map(|nodes| Self::predict_tree(nodes, features))
            .sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn describe(&self) -> String {
        format!("RandomForestRegressor with {} trees", self.n_trees())
    }
}

/// `intercept + coefficients · x`.
#[derive(Clone, Debug)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> StoreResult<Self> {
        if coefficients.is_empty() {
            return Err(StoreError::Invalid(
                "linear model has no coefficients".to_string(),
            ));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl PriceEstimator for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
        check_width("estimator", self.n_features(), features.len())?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    fn describe(&self) -> String {
        format!("LinearRegression over {} features", self.n_features())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> TreeArtefact {
        TreeArtefact {
            nodes: vec![
                NodeArtefact::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                NodeArtefact::Leaf { value: low },
                NodeArtefact::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn standard_scaler_centres_and_scales() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let out = scaler.transform(&[3.0, 0.0]).unwrap();
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], -2.0);
    }

    #[test]
    fn zero_scale_column_passes_through_centred() {
        let scaler = StandardScaler::new(vec![4.0], vec![0.0]).unwrap();
        assert_eq!(scaler.transform(&[6.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn scaler_rejects_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 19], vec![1.0; 19]).unwrap();
        let err = scaler.transform(&[0.0; 18]).unwrap_err();
        assert_eq!(
            err,
            InferenceError::DimensionMismatch {
                stage: "scaler",
                expected: 19,
                actual: 18
            }
        );
    }

    #[test]
    fn scaler_rejects_ragged_statistics() {
        assert!(StandardScaler::new(vec![0.0; 3], vec![1.0; 2]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
    }

    #[test]
    fn forest_averages_tree_outputs() {
        let forest =
            ForestRegressor::new(2, vec![stump(0, 0.5, 10.0, 20.0), stump(1, 0.0, 30.0, 50.0)])
                .unwrap();
        assert_eq!(forest.n_trees(), 2);
        // threshold equality goes left
        assert_relative_eq!(forest.predict(&[0.5, 1.0]).unwrap(), (10.0 + 50.0) / 2.0);
        assert_relative_eq!(forest.predict(&[0.9, -1.0]).unwrap(), (20.0 + 30.0) / 2.0);
        assert_eq!(forest.describe(), "RandomForestRegressor with 2 trees");
    }

    #[test]
    fn forest_rejects_backward_or_dangling_children() {
        let looping = TreeArtefact {
            nodes: vec![
                NodeArtefact::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                NodeArtefact::Leaf { value: 1.0 },
            ],
        };
        assert!(ForestRegressor::new(1, vec![looping]).is_err());
        assert!(ForestRegressor::new(1, vec![stump(3, 0.0, 1.0, 2.0)]).is_err());
        assert!(ForestRegressor::new(1, vec![]).is_err());
    }

    #[test]
    fn linear_regressor_is_affine() {
        let model = LinearRegressor::new(vec![2.0, -1.0], 5.0).unwrap();
        assert_relative_eq!(model.predict(&[3.0, 4.0]).unwrap(), 7.0);
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn artefacts_deserialize_by_kind() {
        let scaler: ScalerArtefact =
            serde_json::from_value(json!({ "kind": "standard", "mean": [0.0], "scale": [1.0] }))
                .unwrap();
        assert_eq!(scaler.into_scaler().unwrap().n_features(), 1);

        let estimator: EstimatorArtefact = serde_json::from_value(json!({
            "kind": "random_forest",
            "n_features": 1,
            "trees": [{ "nodes": [
                { "feature": 0, "threshold": 1.0, "left": 1, "right": 2 },
                { "value": 100.0 },
                { "value": 200.0 }
            ]}]
        }))
        .unwrap();
        let estimator = estimator.into_estimator().unwrap();
        assert_relative_eq!(estimator.predict(&[2.0]).unwrap(), 200.0);
    }
}
