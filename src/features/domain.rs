//! Property record and feature vector definitions.
//!
//! The column order below is the order the scaler and estimator were fitted
//! on. Reordering it does not raise any error; it silently corrupts every
//! price, so the tests pin it index by index.

use serde_json::{Map, Value};

use crate::common::error::{ValidationError, ValidationResult};

/// Number of columns fed to the scaler/estimator: 16 raw + 3 derived.
pub const FEATURE_COUNT: usize = 19;

/// Column names in fitted order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Property_Type",
    "BHK",
    "Size_in_SqFt",
    "Price_per_SqFt",
    "Furnished_Status",
    "Total_Floors",
    "Age_of_Property",
    "Nearby_Schools",
    "Nearby_Hospitals",
    "Public_Transport_Accessibility",
    "Parking_Space",
    "Security",
    "Amenities",
    "Facing",
    "Owner_Type",
    "Availability_Status",
    "Price_per_BHK",
    "Total_Nearby_Amenities",
    "Avg_Floor_Height",
];

/// Fully resolved input record: every absent attribute already replaced by
/// its default. Category-coded fields are plain integers with no range or
/// membership checks; any integer the caller sends is passed through.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRecord {
    pub property_type: i64,
    pub bhk: i64,
    pub size_sqft: f64,
    pub price_per_sqft: f64,
    pub furnished_status: i64,
    pub total_floors: i64,
    pub age_of_property: i64,
    pub nearby_schools: i64,
    pub nearby_hospitals: i64,
    pub public_transport: i64,
    pub parking_space: i64,
    pub security: i64,
    pub amenities: i64,
    pub facing: i64,
    pub owner_type: i64,
    pub availability_status: i64,
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self {
            property_type: 0,
            bhk: 2,
            size_sqft: 1000.0,
            price_per_sqft: 5000.0,
            furnished_status: 0,
            total_floors: 5,
            age_of_property: 5,
            nearby_schools: 2,
            nearby_hospitals: 1,
            public_transport: 1,
            parking_space: 1,
            security: 1,
            amenities: 1,
            facing: 0,
            owner_type: 0,
            availability_status: 0,
        }
    }
}

impl PropertyRecord {
    /// Default-substitution step: read each attribute from a loosely typed
    /// mapping, coerce it, and fall back to the default when absent.
    ///
    /// Keys outside the sixteen known attributes are ignored.
    pub fn from_map(map: &Map<String, Value>) -> ValidationResult<Self> {
        let d = Self::default();
        Ok(Self {
            property_type: int_field(map, "property_type", d.property_type)?,
            bhk: int_field(map, "bhk", d.bhk)?,
            size_sqft: float_field(map, "size_sqft", d.size_sqft)?,
            price_per_sqft: float_field(map, "price_per_sqft", d.price_per_sqft)?,
            furnished_status: int_field(map, "furnished_status", d.furnished_status)?,
            total_floors: int_field(map, "total_floors", d.total_floors)?,
            age_of_property: int_field(map, "age_of_property", d.age_of_property)?,
            nearby_schools: int_field(map, "nearby_schools", d.nearby_schools)?,
            nearby_hospitals: int_field(map, "nearby_hospitals", d.nearby_hospitals)?,
            public_transport: int_field(map, "public_transport", d.public_transport)?,
            parking_space: int_field(map, "parking_space", d.parking_space)?,
            security: int_field(map, "security", d.security)?,
            amenities: int_field(map, "amenities", d.amenities)?,
            facing: int_field(map, "facing", d.facing)?,
            owner_type: int_field(map, "owner_type", d.owner_type)?,
            availability_status: int_field(map, "availability_status", d.availability_status)?,
        })
    }
}

/// Ordered 19-column numeric vector handed to the model store.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of a column by its fitted name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

fn int_field(map: &Map<String, Value>, field: &'static str, default: i64) -> ValidationResult<i64> {
    match map.get(field) {
        None => Ok(default),
        Some(value) => coerce_int(field, value),
    }
}

fn float_field(
    map: &Map<String, Value>,
    field: &'static str,
    default: f64,
) -> ValidationResult<f64> {
    match map.get(field) {
        None => Ok(default),
        Some(value) => coerce_float(field, value),
    }
}

/// Integer coercion: integers as-is, floats truncated toward zero, booleans
/// as 0/1, strings parsed as base-10 integers after trimming whitespace.
fn coerce_int(field: &'static str, value: &Value) -> ValidationResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.trunc().abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(ValidationError::invalid(
                    field,
                    format!("integer out of range: {n}"),
                )),
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid(field, format!("not an integer: {s:?}"))),
        other => Err(ValidationError::invalid(
            field,
            format!("expected an integer, got {}", kind_of(other)),
        )),
    }
}

/// Float coercion: any JSON number, booleans as 0/1, numeric strings.
fn coerce_float(field: &'static str, value: &Value) -> ValidationResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::invalid(field, format!("not a number: {n}"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::invalid(field, format!("not a number: {s:?}"))),
        other => Err(ValidationError::invalid(
            field,
            format!("expected a number, got {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn empty_map_yields_defaults() {
        let record = PropertyRecord::from_map(&Map::new()).unwrap();
        assert_eq!(record, PropertyRecord::default());
    }

    #[test]
    fn integers_are_coerced_loosely() {
        let record = PropertyRecord::from_map(&map(json!({
            "bhk": "3",
            "total_floors": 7.9,
            "parking_space": true,
            "security": false,
            "facing": " 4 ",
            "owner_type": -3,
        })))
        .unwrap();
        assert_eq!(record.bhk, 3);
        assert_eq!(record.total_floors, 7);
        assert_eq!(record.parking_space, 1);
        assert_eq!(record.security, 0);
        assert_eq!(record.facing, 4);
        assert_eq!(record.owner_type, -3);
    }

    #[test]
    fn negative_floats_truncate_toward_zero() {
        let record = PropertyRecord::from_map(&map(json!({ "age_of_property": -2.7 }))).unwrap();
        assert_eq!(record.age_of_property, -2);
    }

    #[test]
    fn floats_accept_strings_and_integers() {
        let record = PropertyRecord::from_map(&map(json!({
            "size_sqft": "1250.5",
            "price_per_sqft": 7200,
        })))
        .unwrap();
        assert_eq!(record.size_sqft, 1250.5);
        assert_eq!(record.price_per_sqft, 7200.0);
    }

    #[test]
    fn category_codes_are_not_range_checked() {
        let record = PropertyRecord::from_map(&map(json!({
            "property_type": 999,
            "furnished_status": -42,
            "availability_status": 1_000_000,
        })))
        .unwrap();
        assert_eq!(record.property_type, 999);
        assert_eq!(record.furnished_status, -42);
        assert_eq!(record.availability_status, 1_000_000);
    }

    #[test]
    fn non_numeric_string_names_the_field() {
        let err = PropertyRecord::from_map(&map(json!({ "bhk": "two" }))).unwrap_err();
        match err {
            ValidationError::InvalidField { field, .. } => assert_eq!(field, "bhk"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decimal_string_is_not_an_integer() {
        let err = PropertyRecord::from_map(&map(json!({ "total_floors": "5.0" }))).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "total_floors", .. }
        ));
    }

    #[test]
    fn null_and_containers_are_rejected() {
        for bad in [json!(null), json!([1]), json!({ "v": 1 })] {
            let err = PropertyRecord::from_map(&map(json!({ "size_sqft": bad }))).unwrap_err();
            assert!(matches!(
                err,
                ValidationError::InvalidField { field: "size_sqft", .. }
            ));
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record = PropertyRecord::from_map(&map(json!({ "city": "Pune", "bhk": 4 }))).unwrap();
        assert_eq!(record.bhk, 4);
    }

    #[test]
    fn huge_unsigned_integer_is_rejected() {
        let err = PropertyRecord::from_map(&map(json!({ "amenities": u64::MAX }))).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "amenities", .. }
        ));
    }

    #[test]
    fn vector_lookup_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[18] = 1.5;
        let vector = FeatureVector::new(values);
        assert_eq!(vector.get("Avg_Floor_Height"), Some(1.5));
        assert_eq!(vector.get("Garden"), None);
        assert_eq!(vector.len(), 19);
    }
}
