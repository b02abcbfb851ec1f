use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat error body: `{"error": "...", "rawError": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Client-facing message
    pub error: String,
    /// Internal error text, only when raw errors are enabled
    #[serde(rename = "rawError", default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<String>,
}

/// Error details inside a [`ResponseEnvelope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "rawError", default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<String>,
}

/// Enveloped body: `{"status": 200, "data": ...}` or `{"status": 404, "error": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            raw_error: None,
        }
    }

    pub fn with_raw_error(mut self, raw_error: Option<String>) -> Self {
        self.raw_error = raw_error;
        self
    }
}

impl ResponseEnvelope {
    /// Success envelope; a null payload leaves `data` out
    pub fn success(status: u16, data: Value) -> Self {
        Self {
            status,
            data: (!data.is_null()).then_some(data),
            error: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>, raw_error: Option<String>) -> Self {
        Self {
            status,
            data: None,
            error: Some(ErrorDetail {
                message: message.into(),
                raw_error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_omits_raw_error() {
        let body = ErrorBody::new("nope");
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"error": "nope"}));
    }

    #[test]
    fn test_error_body_with_raw_error() {
        let body = ErrorBody::new("nope").with_raw_error(Some("db timeout".to_string()));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "nope", "rawError": "db timeout"})
        );
    }

    #[test]
    fn test_success_envelope() {
        let envelope = ResponseEnvelope::success(200, json!({"foo": "bar"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": 200, "data": {"foo": "bar"}})
        );

        let empty = ResponseEnvelope::success(204, Value::Null);
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"status": 204}));
    }

    #[test]
    fn test_failure_envelope() {
        let envelope = ResponseEnvelope::failure(403, "go away", None);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": 403, "error": {"message": "go away"}})
        );
    }
}
