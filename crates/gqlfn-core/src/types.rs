//! Canonical request and response types shared by both runtime modes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::StatusCode;

use crate::error::HandlerError;
use crate::query::parse_query_string;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP methods a GraphQL request may arrive with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = HandlerError;

    /// Invocation payloads are not always upper-cased, so matching ignores case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else {
            Err(HandlerError::MethodNotAllowed(s.to_string()))
        }
    }
}

/// A request in the shape the executor pipeline sees, whatever its origin.
///
/// Built only through the `with_*` methods so both adapters apply the same
/// rules: header names are lower-cased, repeated headers are joined with
/// `", "`, repeated query keys keep the last value, and an empty body is
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
}

impl CanonicalRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Parse a raw (still percent-encoded) query string into the query map.
    pub fn with_query_string(mut self, raw: &str) -> Result<Self, HandlerError> {
        self.query.extend(parse_query_string(raw)?);
        Ok(self)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    /// Look up a header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A response ready to be materialized for the active runtime mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl CanonicalResponse {
    /// A JSON response. Statuses above 599 are clamped to 500.
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let status = if status.as_u16() > 599 {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status
        };
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        Self {
            status: status.as_u16(),
            headers,
            body: body.into(),
        }
    }

    /// Render a handler error as a GraphQL-shaped error document.
    pub fn from_error(err: &HandlerError) -> Self {
        let body = serde_json::json!({
            "errors": [{ "message": err.to_string() }]
        });
        Self::json(err.status(), body.to_string())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
            .map(|(_, value)| value.as_str())
    }
}
