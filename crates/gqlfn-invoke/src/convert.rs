//! Conversions between invocation payloads and the canonical pipeline types.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use gqlfn_core::{Adapter, CanonicalRequest, CanonicalResponse, HandlerError, Method, RuntimeMode};
use serde_json::Value;

use crate::payload::{InvocationPayload, InvocationResponse};

/// The FUNCTION_INVOCATION Normalizer/Materializer pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationAdapter;

impl Adapter for InvocationAdapter {
    type Event = Value;
    type Output = InvocationResponse;

    fn mode(&self) -> RuntimeMode {
        RuntimeMode::FunctionInvocation
    }

    fn normalize(&self, event: Value) -> Result<CanonicalRequest, HandlerError> {
        if !event.is_object() {
            return Err(HandlerError::MalformedPayload(
                "invocation payload must be a JSON object".into(),
            ));
        }
        let payload: InvocationPayload = serde_json::from_value(event)
            .map_err(|e| HandlerError::MalformedPayload(e.to_string()))?;

        let method: Method = payload
            .method()
            .ok_or_else(|| HandlerError::MalformedPayload("missing field `method`".into()))?
            .parse()?;
        let path = payload
            .raw_path()
            .ok_or_else(|| HandlerError::MalformedPayload("missing field `rawPath`".into()))?;

        let mut request = CanonicalRequest::new(method, path)
            .with_query_string(payload.raw_query_string.as_deref().unwrap_or(""))?;
        for (name, value) in payload.headers.iter().flatten() {
            request = request.with_header(name, value);
        }
        // Cookies arrive split out of the header; fold them back in.
        if let Some(cookies) = payload.cookies.filter(|c| !c.is_empty()) {
            let joined = cookies.join("; ");
            request
                .headers
                .entry("cookie".to_string())
                .and_modify(|existing| {
                    existing.push_str("; ");
                    existing.push_str(&joined);
                })
                .or_insert(joined);
        }

        let body = match payload.body {
            Some(body) if payload.is_base64_encoded => BASE64_STANDARD
                .decode(body.as_bytes())
                .map(Bytes::from)
                .map_err(|e| HandlerError::MalformedPayload(format!("invalid base64 body: {e}")))?,
            Some(body) => Bytes::from(body),
            None => Bytes::new(),
        };
        Ok(request.with_body(body))
    }

    fn materialize(&self, response: CanonicalResponse) -> InvocationResponse {
        let text = response
            .content_type()
            .is_some_and(is_textual)
            .then(|| String::from_utf8(response.body.to_vec()).ok())
            .flatten();

        // Bodies that are not valid UTF-8 go out as base64 whatever their type claims.
        let (body, is_base64_encoded) = match text {
            Some(text) => (text, false),
            None => (BASE64_STANDARD.encode(&response.body), true),
        };

        InvocationResponse {
            status_code: response.status,
            headers: response.headers,
            body,
            is_base64_encoded,
        }
    }
}

/// Whether a content type can travel as a plain-text body.
fn is_textual(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("text/")
        || essence == "application/json"
        || essence.ends_with("+json")
        || essence == "application/graphql"
        || essence == "application/xml"
}
