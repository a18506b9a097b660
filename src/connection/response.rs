//! # Response Envelope
//!
//! The remote wraps every successful payload in `{"data": ...}` and every
//! failure in `{"message": ...}`. Decoding preserves object/array shape so
//! the entity mapper can tell a single record from a collection.

use serde::Deserialize;
use serde_json::Value;

use super::errors::ConnectionError;

/// The `message` half of the envelope, tolerated missing or malformed
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
}

/// Decode a successful response body.
///
/// A body without a `data` field decodes to an empty collection.
pub(super) fn decode_success(body: &str) -> Result<Value, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    Ok(match value.get("data") {
        Some(data) => data.clone(),
        None => Value::Array(Vec::new()),
    })
}

/// Decode a failed response into the remote error, keeping the status and
/// whatever message the body carried
pub(super) fn decode_failure(status: u16, body: &str) -> ConnectionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| "Unknown error".to_string());
    ConnectionError::Remote { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_object_data() {
        let data = decode_success(r#"{"data": {"id": 1, "name": "Ada"}}"#).unwrap();
        assert_eq!(data, json!({"id": 1, "name": "Ada"}));
    }

    #[test]
    fn test_success_with_array_data() {
        let data = decode_success(r#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(data, json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn test_success_without_data_is_empty_collection() {
        assert_eq!(decode_success(r#"{"meta": {}}"#).unwrap(), json!([]));
        assert_eq!(decode_success("null").unwrap(), json!([]));
    }

    #[test]
    fn test_success_with_invalid_json_is_a_decode_error() {
        assert!(decode_success("not json").is_err());
    }

    #[test]
    fn test_failure_keeps_status_and_message() {
        let err = decode_failure(422, r#"{"message": "Validation failed"}"#);
        match err {
            ConnectionError::Remote { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_message_falls_back() {
        for body in [r#"{"error": "nope"}"#, "not json", ""] {
            let err = decode_failure(500, body);
            match err {
                ConnectionError::Remote { status, message } => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "Unknown error");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
