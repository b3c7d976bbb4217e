//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod log;

pub use config::AppCfg;
pub use error::{
    InferenceError, InferenceResult, PricerCode, PricerError, PricerResult, StoreError,
    StoreResult, ValidationError, ValidationResult,
};
