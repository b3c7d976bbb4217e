//! Feature assembly: raw record to the fitted 19-column vector.

use serde_json::{Map, Value};

use crate::common::error::{ValidationError, ValidationResult};

use super::domain::{FeatureVector, PropertyRecord};

/// Parse a request body into a loosely typed mapping.
pub fn parse_record(body: &str) -> ValidationResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::Malformed(
            "expected a JSON object".to_string(),
        )),
        Err(err) => Err(ValidationError::Malformed(err.to_string())),
    }
}

/// Validate, default and derive: the full assembler contract.
pub fn assemble(map: &Map<String, Value>) -> ValidationResult<FeatureVector> {
    let record = PropertyRecord::from_map(map)?;
    assemble_record(&record)
}

/// Build the vector from an already resolved record.
pub fn assemble_record(r: &PropertyRecord) -> ValidationResult<FeatureVector> {
    let bhk = r.bhk as f64;

    let price_per_bhk = r.price_per_sqft * bhk;
    let total_nearby_amenities = r.nearby_schools as f64 + r.nearby_hospitals as f64;
    let floor_divisor = match r.bhk.checked_add(1) {
        Some(0) => {
            return Err(ValidationError::DivisionByZero {
                feature: "Avg_Floor_Height",
            })
        }
        Some(d) => d as f64,
        None => bhk + 1.0,
    };
    let avg_floor_height = r.total_floors as f64 / floor_divisor;

    Ok(FeatureVector::new([
        r.property_type as f64,
        bhk,
        r.size_sqft,
        r.price_per_sqft,
        r.furnished_status as f64,
        r.total_floors as f64,
        r.age_of_property as f64,
        r.nearby_schools as f64,
        r.nearby_hospitals as f64,
        r.public_transport as f64,
        r.parking_space as f64,
        r.security as f64,
        r.amenities as f64,
        r.facing as f64,
        r.owner_type as f64,
        r.availability_status as f64,
        price_per_bhk,
        total_nearby_amenities,
        avg_floor_height,
    ]))
}
