use serde::{Deserialize, Deserializer};

use crate::models::{PhotoFeedback, PriceResult};

/// City or district entry, both endpoints answer with a list of these
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

pub fn flatten_names(entries: Vec<NamedEntry>) -> Vec<String> {
    entries.into_iter().map(|e| e.name).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceEstimate {
    #[serde(deserialize_with = "whole_price")]
    pub price: i64,
}

impl From<PriceEstimate> for PriceResult {
    fn from(value: PriceEstimate) -> Self {
        PriceResult(value.price)
    }
}

/// Body of the photo endpoint's response
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoFeedbackResponse {
    #[serde(deserialize_with = "attractiveness_level")]
    pub attractiveness_level: u8,
    #[serde(default)]
    pub attractiveness_reason: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub to_fix: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl From<PhotoFeedbackResponse> for PhotoFeedback {
    fn from(value: PhotoFeedbackResponse) -> Self {
        PhotoFeedback {
            score: value.attractiveness_level,
            reason: value.attractiveness_reason,
            pros: value.pros,
            to_fix: value.to_fix,
            description: value.description,
        }
    }
}

/// Model-backed estimators answer with fractional prices, they are rounded
/// to whole zloty.
fn whole_price<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw.abs() > i64::MAX as f64 {
        return Err(serde::de::Error::custom(format!("price out of range: {raw}")));
    }
    Ok(raw.round() as i64)
}

/// The level arrives as a string ("7") from the service, but a plain number
/// is accepted too. Out-of-range values are clamped to 0-10.
fn attractiveness_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Number(f64),
        Text(String),
    }

    let raw = match Level::deserialize(deserializer)? {
        Level::Number(n) => n,
        Level::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("attractiveness_level is not a number: {s:?}"))
        })?,
    };

    if !raw.is_finite() {
        return Err(serde::de::Error::custom("attractiveness_level is not finite"));
    }

    Ok(raw.round().clamp(0.0, f64::from(PhotoFeedback::MAX_SCORE)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn feedback_level_is_parsed_from_a_string() {
        let body = json!({
            "attractiveness_level": "7",
            "attractiveness_reason": "Jasne wnętrze",
            "type": "mieszkanie",
            "pros": ["duże okna"],
            "to_fix": ["stara podłoga"],
            "description": "Przestronne mieszkanie"
        });

        let feedback: PhotoFeedback = serde_json::from_value::<PhotoFeedbackResponse>(body)
            .unwrap()
            .into();

        assert_eq!(
            feedback,
            PhotoFeedback {
                score: 7,
                reason: "Jasne wnętrze".to_string(),
                pros: vec!["duże okna".to_string()],
                to_fix: vec!["stara podłoga".to_string()],
                description: "Przestronne mieszkanie".to_string(),
            }
        );
    }

    #[test]
    fn feedback_level_accepts_numbers_and_clamps() {
        let high: PhotoFeedbackResponse =
            serde_json::from_value(json!({ "attractiveness_level": 14 })).unwrap();
        let low: PhotoFeedbackResponse =
            serde_json::from_value(json!({ "attractiveness_level": "-3" })).unwrap();

        assert_eq!(high.attractiveness_level, 10);
        assert_eq!(low.attractiveness_level, 0);
    }

    #[test]
    fn feedback_level_garbage_is_an_error() {
        let result =
            serde_json::from_value::<PhotoFeedbackResponse>(json!({ "attractiveness_level": "high" }));
        assert!(result.is_err());
    }

    #[test]
    fn fractional_prices_are_rounded() {
        let estimate: PriceEstimate = serde_json::from_str(r#"{"price": 654321.5}"#).unwrap();
        assert_eq!(PriceResult::from(estimate), PriceResult(654_322));

        let whole: PriceEstimate = serde_json::from_value(json!({ "price": 450000 })).unwrap();
        assert_eq!(whole.price, 450_000);

        let unresolved: PriceEstimate = serde_json::from_value(json!({ "price": -1 })).unwrap();
        assert!(PriceResult::from(unresolved).is_unresolved_address());
    }

    #[test]
    fn names_are_flattened_in_order() {
        let entries: Vec<NamedEntry> =
            serde_json::from_value(json!([{ "name": "Kraków" }, { "name": "Gdańsk" }])).unwrap();
        assert_eq!(flatten_names(entries), vec!["Kraków", "Gdańsk"]);
    }
}
