// lib.rs - house price estimation core
pub mod api;
pub mod common;
pub mod features;
pub mod inference;
pub mod model;

pub use api::{HealthReport, PredictResponse, PriceService};
pub use common::{AppCfg, InferenceError, PricerError, ValidationError};
pub use features::{assemble, FeatureVector, PropertyRecord};
pub use inference::{InferenceGateway, PredictionResult};
