//! Public entry points: the request boundary and its C ABI.

pub mod ffi;
pub mod service;

pub use service::{HealthReport, PredictResponse, PriceService, MODEL_ACCURACY};
