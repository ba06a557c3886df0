use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// Transport envelope produced for every invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

/// Wrap a status code and JSON payload into an envelope with the fixed
/// content-type and CORS headers.
pub fn build_response<T: Serialize>(status_code: u16, body: &T) -> Envelope {
    let body = serde_json::to_string(body)
        .expect("response payloads are plain serde values and always serialize");

    let headers = BTreeMap::from([
        (CONTENT_TYPE.to_string(), "application/json".to_string()),
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
    ]);

    Envelope {
        status_code,
        body,
        headers,
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_response_sets_fixed_headers() {
        let envelope = build_response(200, &json!({"ok": true}));

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.headers.get(CONTENT_TYPE).map(String::as_str), Some("application/json"));
        assert_eq!(envelope.headers.get(ALLOW_ORIGIN).map(String::as_str), Some("*"));
        assert_eq!(envelope.headers.len(), 2);
    }

    #[test]
    fn test_build_response_serializes_body() {
        let envelope = build_response(404, &json!({"error": "note not found"}));
        let body: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body, json!({"error": "note not found"}));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = build_response(201, &json!({}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["body"], "{}");
        assert_eq!(value["headers"]["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_envelope_into_http_response() {
        let response = build_response(201, &json!({"noteId": "abc"})).into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"noteId": "abc"}));
    }
}
