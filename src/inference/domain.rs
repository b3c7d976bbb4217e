//! Domain definitions for price predictions and service readiness.

use serde::Serialize;

use crate::common::error::{InferenceError, InferenceResult};

/// Multipliers of the fixed ±5% band around the point estimate.
///
/// This is a literal envelope, not a statistical interval.
pub const BAND_LOWER: f64 = 0.95;
pub const BAND_UPPER: f64 = 1.05;

/// Estimator output is in lakhs; 100 lakhs make one crore.
pub const LAKHS_PER_CRORE: f64 = 100.0;

/// Result of one inference call, already rounded to 2 decimal places.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub predicted_price_crores: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

impl PredictionResult {
    /// Shape the raw estimator scalar into the response fields.
    ///
    /// Fails when the price or any derived field is not a finite number,
    /// e.g. when the upper band overflows for a huge estimate.
    pub fn from_raw(price: f64) -> InferenceResult<Self> {
        let result = Self {
            predicted_price: round2(price),
            predicted_price_crores: round2(price / LAKHS_PER_CRORE),
            confidence_lower: round2(price * BAND_LOWER),
            confidence_upper: round2(price * BAND_UPPER),
        };
        match result.fields().into_iter().find(|v| !v.is_finite()) {
            Some(bad) => Err(InferenceError::NonFinite(bad)),
            None => Ok(result),
        }
    }

    fn fields(&self) -> [f64; 4] {
        [
            self.predicted_price,
            self.predicted_price_crores,
            self.confidence_lower,
            self.confidence_upper,
        ]
    }
}

/// Which model-store capabilities are currently loaded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Readiness {
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.model_loaded && self.scaler_loaded
    }
}

/// Round to 2 decimal places.
///
/// Rounds the exact decimal value of the float, so `87.345` (stored as
/// `87.3449999...`) becomes `87.34`. No intermediate scaling, so it cannot
/// overflow for large finite inputs.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}
