//! The GraphQL executor seam and operation extraction.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ExecutorFailure, HandlerError};
use crate::types::{CanonicalRequest, Method};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Runs a GraphQL operation against a schema.
///
/// The returned document is the full GraphQL response (`data`, `errors`,
/// `extensions`). Validation and resolver errors belong in that document;
/// `Err` is reserved for the executor itself failing.
pub trait Executor: Send + Sync {
    fn execute(&self, operation: GraphQLOperation) -> BoxFuture<'_, Result<Value, ExecutorFailure>>;
}

/// A GraphQL operation as extracted from a canonical request.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLOperation {
    pub query: String,
    pub variables: Map<String, Value>,
    pub operation_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostBody {
    query: Option<String>,
    #[serde(default)]
    variables: Value,
    operation_name: Option<String>,
}

impl GraphQLOperation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            operation_name: None,
        }
    }

    /// Extract the operation from a canonical request.
    ///
    /// GET reads `query`, `operationName` and JSON-encoded `variables` from
    /// the query string. POST reads a JSON body, or takes the raw body as
    /// the query for `application/graphql`. A POST without a body falls
    /// back to the query string.
    pub fn from_request(request: &CanonicalRequest) -> Result<Self, HandlerError> {
        let operation = match (request.method, &request.body) {
            (Method::Post, Some(body)) if is_graphql_content(request) => {
                let query = std::str::from_utf8(body).map_err(|_| {
                    HandlerError::MalformedPayload("request body is not valid UTF-8".into())
                })?;
                Self::new(query)
            }
            (Method::Post, Some(body)) => {
                let body: PostBody = serde_json::from_slice(body).map_err(|e| {
                    HandlerError::MalformedPayload(format!("invalid JSON body: {e}"))
                })?;
                Self {
                    query: body.query.unwrap_or_default(),
                    variables: variables_from_value(body.variables)?,
                    operation_name: body.operation_name,
                }
            }
            _ => Self::from_query_map(request)?,
        };

        if operation.query.trim().is_empty() {
            return Err(HandlerError::MissingQuery);
        }
        Ok(operation)
    }

    fn from_query_map(request: &CanonicalRequest) -> Result<Self, HandlerError> {
        let variables = match request.query.get("variables") {
            Some(raw) if !raw.trim().is_empty() => {
                let value: Value = serde_json::from_str(raw).map_err(|e| {
                    HandlerError::MalformedPayload(format!("invalid variables: {e}"))
                })?;
                variables_from_value(value)?
            }
            _ => Map::new(),
        };

        Ok(Self {
            query: request.query.get("query").cloned().unwrap_or_default(),
            variables,
            operation_name: request
                .query
                .get("operationName")
                .filter(|name| !name.is_empty())
                .cloned(),
        })
    }
}

fn is_graphql_content(request: &CanonicalRequest) -> bool {
    request
        .header("content-type")
        .is_some_and(|ct| ct.trim_start().starts_with("application/graphql"))
}

fn variables_from_value(value: Value) -> Result<Map<String, Value>, HandlerError> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(HandlerError::MalformedPayload(format!(
            "variables must be a JSON object, got {other}"
        ))),
    }
}
