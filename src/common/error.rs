//! Error handling primitives shared across the core.
//!
//! Requests fail with exactly two kinds of error: [`ValidationError`] for
//! input that cannot be turned into a feature vector and [`InferenceError`]
//! for a model store that is missing or disagrees with the vector. Artefact
//! loading has its own [`StoreError`] which never reaches a request; it only
//! degrades the service to "not ready".

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PricerCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Input failed validation or derived-feature arithmetic.
    InvalidInput = 1,
    /// Scaler or estimator is not loaded.
    NotReady = 2,
    /// Vector width disagrees with what the scaler/estimator were fitted on.
    DimensionMismatch = 3,
    /// Catch-all for estimator faults and bugs.
    Internal = 4,
}

/// Malformed or type-incompatible input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("division by zero while computing {feature}")]
    DivisionByZero { feature: &'static str },

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Model store unavailable or inconsistent with the assembled vector.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    #[error("Model not loaded properly")]
    NotReady,

    #[error("{stage} expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("estimator produced a non-finite price: {0}")]
    NonFinite(f64),
}

/// Failures while loading persisted scaler/estimator artefacts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read artefact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artefact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artefact: {0}")]
    Invalid(String),
}

/// Request-level error: everything `predict` can fail with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
pub type InferenceResult<T> = Result<T, InferenceError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type PricerResult<T> = Result<T, PricerError>;

impl ValidationError {
    /// Field coercion helper.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl InferenceError {
    pub fn code(&self) -> PricerCode {
        match self {
            InferenceError::NotReady => PricerCode::NotReady,
            InferenceError::DimensionMismatch { .. } => PricerCode::DimensionMismatch,
            InferenceError::NonFinite(_) => PricerCode::Internal,
        }
    }
}

impl PricerError {
    /// Machine parsable code for the C ABI and structured logs.
    pub fn code(&self) -> PricerCode {
        match self {
            PricerError::Validation(_) => PricerCode::InvalidInput,
            PricerError::Inference(err) => err.code(),
        }
    }
}
