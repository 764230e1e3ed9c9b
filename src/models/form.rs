use serde::{Deserialize, Serialize};

use super::enums::{AdType, Availability, HeatingType, MarketType, OwnershipType, StateType};

/// Everything the user enters for one estimation request.
///
/// Attachments are not part of the record: the estimate endpoint only takes
/// scalars, and the photo endpoint receives files next to the serialized
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    /// Free-text street address
    pub location: String,
    pub city: String,
    pub district: String,

    /// Usable area in square meters
    pub area: Option<f64>,
    pub rooms: Option<u32>,
    /// Floor number, 0 is the ground floor
    pub floor: Option<i32>,
    #[serde(rename = "floorsInBuilding")]
    pub floors_in_building: Option<u32>,

    pub balcony: bool,
    pub separate_kitchen: bool,

    pub state: StateType,
    pub market: MarketType,
    pub ad_type: AdType,
    pub ownership: OwnershipType,
    pub heating: HeatingType,
    pub available: Availability,

    pub garage: bool,
    pub elevator: bool,
    pub basement: bool,

    /// Monthly rent in PLN
    pub rent: Option<f64>,
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            location: String::new(),
            city: String::new(),
            district: String::new(),
            area: None,
            rooms: None,
            floor: None,
            floors_in_building: None,
            balcony: false,
            separate_kitchen: false,
            state: StateType::default(),
            market: MarketType::default(),
            ad_type: AdType::default(),
            ownership: OwnershipType::default(),
            heating: HeatingType::default(),
            available: Availability::default(),
            garage: false,
            elevator: false,
            basement: false,
            rent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_record_serializes_nulls_and_default_codes() {
        let value = serde_json::to_value(FormRecord::default()).unwrap();

        assert_eq!(value["area"], json!(null));
        assert_eq!(value["floorsInBuilding"], json!(null));
        assert_eq!(value["heating"], json!("miejskie"));
        assert_eq!(value["state"], json!("do_zamieszkania"));
        assert_eq!(value["available"], json!("od zaraz"));
        assert_eq!(value["balcony"], json!(false));
    }

    #[test]
    fn serialized_record_has_no_attachment_field() {
        let value = serde_json::to_value(FormRecord::default()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(keys.len(), 19);
        assert!(!keys.iter().any(|k| k.as_str() == "files"));
    }
}
