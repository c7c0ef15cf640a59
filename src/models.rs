//! # Subscription Models
//!
//! Wire and storage shapes shared by the store and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// True for the zero instant `0001-01-01T00:00:00Z`, which clients send for "no date"
pub fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    ts.timestamp() == ZERO_TIME_SECS && ts.timestamp_subsec_nanos() == 0
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(date.filter(|ts| !is_zero_time(ts)))
}

/// A user's subscription to a paid service.
///
/// Every field defaults to its zero value when absent from a JSON body, so
/// the same type doubles as a partial update and as a list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    /// Store-assigned identifier
    pub id: i64,

    /// Owner of the subscription (nil UUID means "no record")
    pub user_id: Uuid,

    /// Name of the subscribed service
    pub service_name: String,

    /// Price in the smallest currency unit
    pub price: i64,

    /// Subscription start (RFC 3339)
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: Option<DateTime<Utc>>,

    /// Subscription end (RFC 3339)
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: Option<DateTime<Utc>>,

    /// Request-only flag asking for an unfiltered list
    #[serde(skip_serializing)]
    pub all: bool,
}

impl Subscription {
    /// True when this value is the zero record returned for a missing id
    pub fn is_missing(&self) -> bool {
        self.user_id.is_nil()
    }

    /// The same filter with both date fields cleared
    pub fn without_dates(&self) -> Self {
        Self {
            start_date: None,
            end_date: None,
            ..self.clone()
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_decode_to_zero_values() {
        let sub: Subscription = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sub, Subscription::default());
        assert!(sub.is_missing());
    }

    #[test]
    fn test_decode_full_record() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": 7,
            "user_id": "123e4567-e89b-12d3-a456-426614174000",
            "service_name": "Netflix",
            "price": 1000,
            "start_date": "2023-01-15T00:00:00Z",
            "end_date": "2023-02-15T00:00:00Z",
            "all": true
        }))
        .unwrap();

        assert_eq!(sub.id, 7);
        assert_eq!(sub.service_name, "Netflix");
        assert_eq!(sub.price, 1000);
        assert!(sub.all);
        assert!(!sub.is_missing());
        assert_eq!(
            sub.start_date.unwrap().to_rfc3339(),
            "2023-01-15T00:00:00+00:00"
        );
    }

    #[test]
    fn test_all_flag_is_not_serialized() {
        let sub = Subscription {
            all: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&sub).unwrap();
        assert!(value.get("all").is_none());
        assert!(value.get("service_name").is_some());
    }

    #[test]
    fn test_without_dates_keeps_other_fields() {
        let sub = Subscription {
            service_name: "Spotify".to_string(),
            price: 300,
            start_date: Some(Utc::now()),
            end_date: Some(Utc::now()),
            ..Default::default()
        };
        let cleared = sub.without_dates();
        assert_eq!(cleared.start_date, None);
        assert_eq!(cleared.end_date, None);
        assert_eq!(cleared.service_name, "Spotify");
        assert_eq!(cleared.price, 300);
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("bad request", 400)).unwrap();
        assert_eq!(value, json!({"message": "bad request", "code": 400}));
    }

    #[test]
    fn test_zero_time_decodes_as_absent() {
        let sub: Subscription = serde_json::from_value(json!({
            "start_date": "0001-01-01T00:00:00Z",
            "end_date": null
        }))
        .unwrap();
        assert_eq!(sub.start_date, None);
        assert_eq!(sub.end_date, None);

        let near: Subscription =
            serde_json::from_value(json!({"start_date": "0001-01-01T00:00:01Z"})).unwrap();
        assert!(near.start_date.is_some());
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        let result: Result<Subscription, _> =
            serde_json::from_value(json!({"user_id": "not-a-uuid"}));
        assert!(result.is_err());
    }
}
