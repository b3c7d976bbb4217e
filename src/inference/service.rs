//! Inference gateway: scale, predict and shape one feature vector.

use std::sync::Arc;

use tracing::{error, info};

use crate::common::error::{InferenceError, InferenceResult};
use crate::features::FeatureVector;
use crate::model::{FeatureScaler, ModelStore, PriceEstimator};

use super::domain::{PredictionResult, Readiness};

/// Owns the two model-store capabilities for the lifetime of the process.
///
/// Either capability may be absent when its artefact failed to load; the
/// gateway then stays not-ready for good and every prediction fails fast.
#[derive(Clone, Default)]
pub struct InferenceGateway {
    scaler: Option<Arc<dyn FeatureScaler>>,
    estimator: Option<Arc<dyn PriceEstimator>>,
}

impl InferenceGateway {
    pub fn new(scaler: Arc<dyn FeatureScaler>, estimator: Arc<dyn PriceEstimator>) -> Self {
        Self {
            scaler: Some(scaler),
            estimator: Some(estimator),
        }
    }

    /// A gateway with nothing loaded.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Load both capabilities from the store. Failures are logged and leave
    /// the corresponding capability absent; this never panics.
    pub fn from_store(store: &dyn ModelStore) -> Self {
        let estimator: Option<Arc<dyn PriceEstimator>> = match store.load_estimator() {
            Ok(estimator) => {
                info!(model = %estimator.describe(), "estimator loaded");
                Some(Arc::from(estimator))
            }
            Err(err) => {
                error!(error = %err, "failed to load estimator");
                None
            }
        };
        let scaler: Option<Arc<dyn FeatureScaler>> = match store.load_scaler() {
            Ok(scaler) => {
                info!(n_features = scaler.n_features(), "scaler loaded");
                Some(Arc::from(scaler))
            }
            Err(err) => {
                error!(error = %err, "failed to load scaler");
                None
            }
        };

        let gateway = Self { scaler, estimator };
        if gateway.is_ready() {
            info!("model and scaler loaded");
        }
        gateway
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            model_loaded: self.estimator.is_some(),
            scaler_loaded: self.scaler.is_some(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Scale the vector, run the estimator and shape the result.
    pub fn predict(&self, features: &FeatureVector) -> InferenceResult<PredictionResult> {
        let (scaler, estimator) = match (&self.scaler, &self.estimator) {
            (Some(scaler), Some(estimator)) => (scaler, estimator),
            _ => return Err(InferenceError::NotReady),
        };

        let scaled = scaler.transform(features.as_slice())?;
        let price = estimator.predict(&scaled)?;
        if !price.is_finite() {
            return Err(InferenceError::NonFinite(price));
        }

        PredictionResult::from_raw(price)
    }
}
