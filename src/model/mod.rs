//! Model store: the pre-fitted scaler and estimator consumed by inference.
//!
//! Artefacts are produced by an offline training pipeline and loaded once at
//! start-up. Nothing in this crate refits or mutates them.

pub mod domain;
pub mod repo_fs;

pub use domain::{FeatureScaler, ModelStore, PriceEstimator};
pub use repo_fs::FsModelStore;
