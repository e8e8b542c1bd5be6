//! Per-invocation request pipeline.
//!
//! `Pipeline` ties one [`Adapter`] to one [`Executor`]. It holds no mutable
//! state, so a single instance is shared (behind `Arc`) by every concurrent
//! connection or invocation.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, error, warn};

use crate::adapter::Adapter;
use crate::error::{ExecutorFailure, HandlerError};
use crate::executor::{Executor, GraphQLOperation};
use crate::types::{CanonicalRequest, CanonicalResponse};

pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

pub struct Pipeline<A> {
    adapter: A,
    executor: Arc<dyn Executor>,
    graphql_path: String,
}

impl<A: Adapter> Pipeline<A> {
    pub fn new(adapter: A, executor: Arc<dyn Executor>) -> Self {
        Self {
            adapter,
            executor,
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
        }
    }

    /// Serve GraphQL at `path` instead of [`DEFAULT_GRAPHQL_PATH`].
    pub fn with_graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    pub fn graphql_path(&self) -> &str {
        &self.graphql_path
    }

    /// Handle one inbound event end to end.
    ///
    /// Never fails: every error is materialized as a JSON error document
    /// with the matching status code.
    pub async fn handle(&self, event: A::Event) -> A::Output {
        let response = match self.adapter.normalize(event) {
            Ok(request) => self.respond(request).await,
            Err(e) => {
                warn!(mode = %self.adapter.mode(), error = %e, "rejected inbound event");
                CanonicalResponse::from_error(&e)
            }
        };
        self.adapter.materialize(response)
    }

    /// Materialize an error raised by the host before the event could be
    /// normalized, such as an unreadable or oversized request body.
    pub fn reject(&self, err: &HandlerError) -> A::Output {
        warn!(mode = %self.adapter.mode(), error = %err, "rejected inbound event");
        self.adapter.materialize(CanonicalResponse::from_error(err))
    }

    /// Execute a canonical request and build the canonical response.
    pub async fn respond(&self, request: CanonicalRequest) -> CanonicalResponse {
        let method = request.method;
        let path = request.path.clone();
        match self.execute(request).await {
            Ok(response) => {
                debug!(%method, %path, status = response.status, "request handled");
                response
            }
            Err(e @ HandlerError::ExecutorFailure(_)) => {
                error!(%method, %path, error = %e, "executor failed");
                CanonicalResponse::from_error(&e)
            }
            Err(e) => {
                warn!(%method, %path, error = %e, "request rejected");
                CanonicalResponse::from_error(&e)
            }
        }
    }

    async fn execute(&self, request: CanonicalRequest) -> Result<CanonicalResponse, HandlerError> {
        if !self.serves(&request.path) {
            return Err(HandlerError::NotFound(request.path));
        }

        let operation = GraphQLOperation::from_request(&request)?;
        debug!(
            operation_name = operation.operation_name.as_deref().unwrap_or("<anonymous>"),
            "executing operation"
        );

        let document = self.executor.execute(operation).await?;
        let body = serde_json::to_vec(&document)
            .map_err(|e| ExecutorFailure::new(format!("unserializable result: {e}")))?;
        Ok(CanonicalResponse::json(StatusCode::OK, body))
    }

    fn serves(&self, path: &str) -> bool {
        let normalize = |p: &str| p.trim_end_matches('/').to_string();
        normalize(path) == normalize(&self.graphql_path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::executor::BoxFuture;
    use crate::mode::RuntimeMode;
    use crate::types::Method;

    /// Passes canonical values straight through.
    struct Identity;

    impl Adapter for Identity {
        type Event = CanonicalRequest;
        type Output = CanonicalResponse;

        fn mode(&self) -> RuntimeMode {
            RuntimeMode::LocalHttp
        }

        fn normalize(&self, event: CanonicalRequest) -> Result<CanonicalRequest, HandlerError> {
            Ok(event)
        }

        fn materialize(&self, response: CanonicalResponse) -> CanonicalResponse {
            response
        }
    }

    struct Fixed(Result<Value, ExecutorFailure>);

    impl Executor for Fixed {
        fn execute(&self, _: GraphQLOperation) -> BoxFuture<'_, Result<Value, ExecutorFailure>> {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    fn pipeline(result: Result<Value, ExecutorFailure>) -> Pipeline<Identity> {
        Pipeline::new(Identity, Arc::new(Fixed(result)))
    }

    fn query(path: &str) -> CanonicalRequest {
        CanonicalRequest::new(Method::Get, path)
            .with_query_string("query=%7B+sysInfo+%7D")
            .unwrap()
    }

    fn body(resp: &CanonicalResponse) -> Value {
        serde_json::from_slice(&resp.body).unwrap()
    }

    #[tokio::test]
    async fn data_passes_through_unchanged() {
        let data = json!({ "data": { "sysInfo": "linux x86_64", "n": [1, 2.5, null] } });
        let resp = pipeline(Ok(data.clone())).handle(query("/graphql")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(body(&resp), data);
    }

    #[tokio::test]
    async fn graphql_errors_stay_in_band() {
        let doc = json!({ "data": null, "errors": [{ "message": "Cannot query field X" }] });
        let resp = pipeline(Ok(doc.clone())).handle(query("/graphql")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(body(&resp)["errors"], doc["errors"]);
    }

    #[tokio::test]
    async fn executor_failure_is_500() {
        let resp = pipeline(Err(ExecutorFailure::new("boom")))
            .handle(query("/graphql"))
            .await;
        assert_eq!(resp.status, 500);
        assert_eq!(body(&resp)["errors"][0]["message"], "executor failed: boom");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let resp = pipeline(Ok(json!({}))).handle(query("/other")).await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn trailing_slash_is_served() {
        let resp = pipeline(Ok(json!({ "data": {} }))).handle(query("/graphql/")).await;
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn custom_path() {
        let p = pipeline(Ok(json!({ "data": {} }))).with_graphql_path("/api");
        assert_eq!(p.graphql_path(), "/api");
        assert_eq!(p.handle(query("/api")).await.status, 200);
        assert_eq!(p.handle(query("/graphql")).await.status, 404);
    }

    #[tokio::test]
    async fn missing_query_is_400() {
        let req = CanonicalRequest::new(Method::Get, "/graphql");
        let resp = pipeline(Ok(json!({}))).handle(req).await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.content_type(), Some("application/json"));
    }

    #[test]
    fn reject_materializes_error_document() {
        let resp = pipeline(Ok(json!({}))).reject(&HandlerError::PayloadTooLarge(16));
        assert_eq!(resp.status, 413);
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(
            body(&resp)["errors"][0]["message"],
            "request body exceeds 16 bytes"
        );
    }
}
