//! HTTP type conversions between hyper and the canonical pipeline types.
//!
//! [`LocalHttpAdapter`] is the LOCAL_HTTP Normalizer/Materializer pair: a
//! buffered `http::Request` goes in, a `hyper::Response` comes out.

use bytes::Bytes;
use gqlfn_core::{Adapter, CanonicalRequest, CanonicalResponse, HandlerError, RuntimeMode};
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};
use http_body_util::Full;

/// Adapter for requests arriving on the local hyper listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHttpAdapter;

impl Adapter for LocalHttpAdapter {
    type Event = Request<Bytes>;
    type Output = Response<Full<Bytes>>;

    fn mode(&self) -> RuntimeMode {
        RuntimeMode::LocalHttp
    }

    fn normalize(&self, event: Request<Bytes>) -> Result<CanonicalRequest, HandlerError> {
        let (parts, body) = event.into_parts();
        let method = parts.method.as_str().parse()?;

        let mut request = CanonicalRequest::new(method, parts.uri.path())
            .with_query_string(parts.uri.query().unwrap_or(""))?;
        for (name, value) in headers_to_tuples(&parts.headers) {
            request = request.with_header(&name, &value);
        }
        Ok(request.with_body(body))
    }

    fn materialize(&self, response: CanonicalResponse) -> Response<Full<Bytes>> {
        let mut out = Response::new(Full::new(response.body));
        *out.status_mut() = status_from_u16(response.status);
        *out.headers_mut() = headers_from_tuples(response.headers);
        out
    }
}

/// Convert a status code from u16.
pub fn status_from_u16(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Convert headers from (name, value) pairs, dropping any that are not valid HTTP.
pub fn headers_from_tuples<I>(tuples: I) -> HeaderMap
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in tuples {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            map.append(name, value);
        }
    }
    map
}

/// Convert headers to (name, value) pairs. Non-UTF-8 values are decoded lossily.
pub fn headers_to_tuples(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
