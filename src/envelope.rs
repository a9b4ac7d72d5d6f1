//! Response envelope decoding
//!
//! Every Netpalm response is wrapped as `{"status": ..., "data": ...}`. This
//! module turns a raw body into an [`Envelope`] and applies the checking
//! policy callers ask for:
//!
//! - JSON that is not an object is wrapped as `{"data": <body>}`
//! - an undecodable body is "no content" on `204`, a decode error otherwise
//! - an absent or empty `data` falls back to the whole decoded object
//! - strict checking rejects unknown, failed or payload-less responses

use crate::error::{Error, Result};
use crate::types::ServiceStatus;
use serde_json::{Map, Value};

/// HTTP status the service uses for responses without a body
pub const NO_CONTENT: u16 = 204;

/// The `status` field of an envelope, validated against [`ServiceStatus`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusField {
    /// A recognised service status
    Known(ServiceStatus),
    /// A status string outside the enumeration
    Unknown(String),
    /// No status field, or one that is not a string
    Missing,
}

impl StatusField {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(raw)) => raw
                .parse()
                .map(StatusField::Known)
                .unwrap_or_else(|_| StatusField::Unknown(raw.clone())),
            _ => StatusField::Missing,
        }
    }

    /// The recognised status, if any
    pub fn known(&self) -> Option<ServiceStatus> {
        match self {
            StatusField::Known(status) => Some(*status),
            _ => None,
        }
    }

    fn raw(&self) -> Option<String> {
        match self {
            StatusField::Known(status) => Some(status.as_str().to_string()),
            StatusField::Unknown(raw) => Some(raw.clone()),
            StatusField::Missing => None,
        }
    }
}

/// A decoded response
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Outcome of the API call
    pub status: StatusField,
    /// The payload, or the whole response when `data` was absent or empty
    pub data: Value,
    data_was_empty: bool,
}

impl Envelope {
    /// Decode a response body
    ///
    /// Returns `Ok(None)` for an undecodable body on a `204 No Content`.
    pub fn from_body(
        body: &[u8],
        http_status: u16,
    ) -> std::result::Result<Option<Self>, serde_json::Error> {
        let decoded: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) if http_status == NO_CONTENT => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(Self::from_value(decoded)))
    }

    /// Build an envelope from already-decoded JSON
    pub fn from_value(decoded: Value) -> Self {
        let object = match decoded {
            Value::Object(object) => object,
            other => {
                let mut wrapped = Map::new();
                wrapped.insert("data".to_string(), other);
                wrapped
            }
        };

        let status = StatusField::from_value(object.get("status"));
        let data_was_empty = object.get("data").is_none_or(is_empty);

        let data = if data_was_empty {
            Value::Object(object)
        } else {
            let mut object = object;
            object.remove("data").unwrap_or(Value::Null)
        };

        Self {
            status,
            data,
            data_was_empty,
        }
    }

    /// Whether the response carried a non-empty `data` field
    pub fn has_data(&self) -> bool {
        !self.data_was_empty
    }

    /// Return the payload, applying strict checks when requested
    ///
    /// With `strict`, fails if the status is missing or unknown, if it reports
    /// failure, or if a successful response carried no data.
    pub fn into_data(self, endpoint: &str, strict: bool) -> Result<Value> {
        if strict {
            match &self.status {
                StatusField::Known(status) if status.is_ok() => {}
                StatusField::Known(status) => {
                    return Err(Error::StatusFailed {
                        endpoint: endpoint.to_string(),
                        status: status.to_string(),
                    });
                }
                other => {
                    return Err(Error::InvalidStatus {
                        endpoint: endpoint.to_string(),
                        status: other.raw(),
                    });
                }
            }

            if self.data_was_empty {
                return Err(Error::NoData {
                    endpoint: endpoint.to_string(),
                    response: self.data.to_string(),
                });
            }
        }

        Ok(self.data)
    }
}

/// JSON falsiness: null, false, zero, and empty strings, arrays and objects
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        Envelope::from_value(value)
    }

    #[test]
    fn success_envelope_yields_data() {
        let env = envelope(json!({"status": "success", "data": {"task_id": "abc"}}));
        assert_eq!(env.status, StatusField::Known(ServiceStatus::Success));
        assert!(env.has_data());
        assert_eq!(
            env.into_data("getconfig", true).unwrap(),
            json!({"task_id": "abc"})
        );
    }

    #[test]
    fn empty_data_is_no_data_under_strict_checking() {
        let env = envelope(json!({"status": "success", "data": {}}));
        match env.into_data("task/abc", true).unwrap_err() {
            Error::NoData { endpoint, response } => {
                assert_eq!(endpoint, "task/abc");
                assert!(response.contains("success"), "{response}");
            }
            other => panic!("expected NoData, got {other:?}"),
        }
    }

    #[test]
    fn empty_data_falls_back_to_whole_envelope_when_lenient() {
        let raw = json!({"status": "success", "data": {}});
        let data = envelope(raw.clone()).into_data("task/abc", false).unwrap();
        assert_eq!(data, raw);
    }

    #[test]
    fn absent_data_falls_back_to_whole_envelope() {
        let raw = json!({"status": "success", "task_id": ["a", "b"]});
        let env = envelope(raw.clone());
        assert!(!env.has_data());
        assert_eq!(env.into_data("taskqueue", false).unwrap(), raw);
    }

    #[test]
    fn falsy_data_values_count_as_empty() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([])] {
            let env = envelope(json!({"status": "success", "data": falsy}));
            assert!(!env.has_data(), "{falsy} should count as empty");
        }
        for truthy in [json!(true), json!(1), json!("x"), json!([0]), json!({"k": null})] {
            let env = envelope(json!({"status": "success", "data": truthy}));
            assert!(env.has_data(), "{truthy} should count as data");
        }
    }

    #[test]
    fn non_object_body_is_wrapped_as_data() {
        let env = envelope(json!(["task-1", "task-2"]));
        assert_eq!(env.status, StatusField::Missing);
        assert_eq!(
            env.into_data("taskqueue", false).unwrap(),
            json!(["task-1", "task-2"])
        );
    }

    #[test]
    fn wrapped_non_object_still_fails_strict_status_check() {
        let err = envelope(json!("ok")).into_data("taskqueue", true).unwrap_err();
        assert!(
            matches!(err, Error::InvalidStatus { status: None, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn unknown_status_is_invalid_under_strict_checking() {
        let env = envelope(json!({"status": "maybe", "data": {"x": 1}}));
        assert_eq!(env.status, StatusField::Unknown("maybe".to_string()));
        match env.into_data("task/abc", true).unwrap_err() {
            Error::InvalidStatus { status, .. } => assert_eq!(status.as_deref(), Some("maybe")),
            other => panic!("expected InvalidStatus, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_tolerated_when_lenient() {
        let env = envelope(json!({"status": "maybe", "data": {"x": 1}}));
        assert_eq!(env.into_data("task/abc", false).unwrap(), json!({"x": 1}));
    }

    #[test]
    fn non_string_status_counts_as_missing() {
        let env = envelope(json!({"status": 200, "data": {"x": 1}}));
        assert_eq!(env.status, StatusField::Missing);
        assert!(env.status.known().is_none());
    }

    #[test]
    fn error_status_fails_strict_checking_even_with_data() {
        let env = envelope(json!({
            "status": "error",
            "data": {"task_errors": ["boom"]}
        }));
        match env.into_data("getconfig", true).unwrap_err() {
            Error::StatusFailed { status, endpoint } => {
                assert_eq!(status, "error");
                assert_eq!(endpoint, "getconfig");
            }
            other => panic!("expected StatusFailed, got {other:?}"),
        }
    }

    #[test]
    fn error_status_passes_through_when_lenient() {
        let env = envelope(json!({"status": "error", "data": {"task_errors": ["boom"]}}));
        assert_eq!(
            env.into_data("getconfig", false).unwrap(),
            json!({"task_errors": ["boom"]})
        );
    }

    #[test]
    fn undecodable_body_on_no_content_is_none() {
        assert!(Envelope::from_body(b"", NO_CONTENT).unwrap().is_none());
        assert!(Envelope::from_body(b"<html>", NO_CONTENT).unwrap().is_none());
    }

    #[test]
    fn undecodable_body_otherwise_is_an_error() {
        assert!(Envelope::from_body(b"", 200).is_err());
        assert!(Envelope::from_body(b"<html>oops</html>", 500).is_err());
    }

    #[test]
    fn decodable_body_on_no_content_is_still_decoded() {
        let env = Envelope::from_body(br#"{"status":"success","data":{"a":1}}"#, NO_CONTENT)
            .unwrap()
            .unwrap();
        assert_eq!(env.data, json!({"a": 1}));
    }
}
