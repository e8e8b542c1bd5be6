//! Wire shapes exchanged with the function-invocation dispatcher.
//!
//! The dispatcher owns these shapes. Inbound fields are all optional here so
//! that missing ones can be reported as `MalformedPayload` with a useful
//! message instead of a generic deserialization error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An inbound invocation event.
///
/// The flat `method`/`rawPath` form is primary. The nested
/// `requestContext.http.method` form and the older `httpMethod`/`path` form
/// are accepted as fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationPayload {
    pub method: Option<String>,
    pub raw_path: Option<String>,
    pub raw_query_string: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    /// Cookies split out of the `Cookie` header by the dispatcher.
    #[serde(default)]
    pub cookies: Option<Vec<String>>,
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,

    pub request_context: Option<RequestContext>,
    pub http_method: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    pub http: Option<RequestContextHttp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContextHttp {
    pub method: Option<String>,
}

impl InvocationPayload {
    pub fn method(&self) -> Option<&str> {
        self.method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .and_then(|http| http.method.as_deref())
            })
            .or(self.http_method.as_deref())
    }

    pub fn raw_path(&self) -> Option<&str> {
        self.raw_path.as_deref().or(self.path.as_deref())
    }
}

/// The structured response returned as the invocation's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_payload() {
        let payload: InvocationPayload = serde_json::from_value(json!({
            "method": "GET",
            "rawPath": "/graphql",
            "rawQueryString": "query=%7B+sysInfo+%7D",
            "headers": {},
            "isBase64Encoded": false
        }))
        .unwrap();
        assert_eq!(payload.method(), Some("GET"));
        assert_eq!(payload.raw_path(), Some("/graphql"));
        assert_eq!(payload.raw_query_string.as_deref(), Some("query=%7B+sysInfo+%7D"));
        assert!(!payload.is_base64_encoded);
    }

    #[test]
    fn cookies_field() {
        let payload: InvocationPayload = serde_json::from_value(json!({
            "method": "GET",
            "rawPath": "/graphql",
            "cookies": ["a=1", "b=2"]
        }))
        .unwrap();
        assert_eq!(
            payload.cookies,
            Some(vec!["a=1".to_string(), "b=2".to_string()])
        );
    }

    #[test]
    fn request_context_method() {
        let payload: InvocationPayload = serde_json::from_value(json!({
            "rawPath": "/graphql",
            "requestContext": { "http": { "method": "POST", "path": "/graphql" } }
        }))
        .unwrap();
        assert_eq!(payload.method(), Some("POST"));
    }

    #[test]
    fn legacy_fields() {
        let payload: InvocationPayload = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/graphql",
            "headers": null
        }))
        .unwrap();
        assert_eq!(payload.method(), Some("GET"));
        assert_eq!(payload.raw_path(), Some("/graphql"));
        assert!(payload.headers.is_none());
    }

    #[test]
    fn response_serializes_camel_case() {
        let resp = InvocationResponse {
            status_code: 200,
            headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: "{}".to_string(),
            is_base64_encoded: false,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "statusCode": 200,
                "headers": { "Content-Type": "application/json" },
                "body": "{}",
                "isBase64Encoded": false
            })
        );
    }
}
