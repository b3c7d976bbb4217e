//! Feature assembly: turns a sparse, loosely typed property record into the
//! fixed-order vector the scaler and estimator were fitted on.

pub mod domain;
pub mod service;

pub use domain::{FeatureVector, PropertyRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use service::{assemble, assemble_record, parse_record};
