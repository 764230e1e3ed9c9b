//! Required-field and format checks. Validation always blocks submission.

use std::collections::BTreeMap;

use crate::form::fields::{Field, FieldError};
use crate::models::FormRecord;

pub const REQUIRED: [Field; 4] = [Field::City, Field::District, Field::Area, Field::Rooms];

/// Not checked before submitting, but the estimator may refuse a record
/// without them
pub const RECOMMENDED: [Field; 2] = [Field::Floor, Field::FloorsInBuilding];

pub fn missing_recommended(record: &FormRecord) -> Vec<Field> {
    RECOMMENDED
        .into_iter()
        .filter(|field| !field.is_filled(record))
        .collect()
}

pub fn is_required(field: Field) -> bool {
    REQUIRED.contains(&field)
}

/// Problems with the record as it stands, keyed by field
pub fn validate(record: &FormRecord) -> BTreeMap<Field, FieldError> {
    let mut errors = BTreeMap::new();

    for field in REQUIRED {
        if !field.is_filled(record) {
            errors.insert(field, FieldError::Required);
        }
    }

    if record.area.is_some_and(|area| area <= 0.0) {
        errors.insert(Field::Area, FieldError::NotPositive);
    }

    if record.rooms == Some(0) {
        errors.insert(Field::Rooms, FieldError::NoRooms);
    }

    if let (Some(floor), Some(floors)) = (record.floor, record.floors_in_building) {
        if i64::from(floor) > i64::from(floors) {
            errors.insert(Field::Floor, FieldError::FloorAboveBuilding);
        }
    }

    errors
}
