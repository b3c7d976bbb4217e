//! Inference domain: scaling, prediction and response shaping.

pub mod domain;
pub mod service;

pub use domain::{PredictionResult, Readiness};
pub use service::InferenceGateway;
