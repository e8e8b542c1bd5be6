//! The function-invocation event loop.

use std::sync::Arc;

use gqlfn_core::Pipeline;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{debug, info};

use crate::convert::InvocationAdapter;
use crate::payload::InvocationResponse;

/// Handle a single invocation event.
pub async fn handle_event(
    pipeline: &Pipeline<InvocationAdapter>,
    event: LambdaEvent<Value>,
) -> Result<InvocationResponse, Error> {
    let LambdaEvent { payload, context } = event;
    debug!(request_id = %context.request_id, "invocation received");

    let response = pipeline.handle(payload).await;
    debug!(
        request_id = %context.request_id,
        status = response.status_code,
        "invocation completed"
    );
    Ok(response)
}

/// Poll the dispatcher for invocations until the host stops the process.
pub async fn run(pipeline: Arc<Pipeline<InvocationAdapter>>) -> Result<(), Error> {
    info!(path = pipeline.graphql_path(), "function-invocation runtime starting");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let pipeline = pipeline.clone();
        async move { handle_event(&pipeline, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use gqlfn_core::{BoxFuture, Executor, ExecutorFailure, GraphQLOperation};
    use lambda_runtime::Context;
    use serde_json::json;

    use super::*;

    struct Echo;

    impl Executor for Echo {
        fn execute(&self, op: GraphQLOperation) -> BoxFuture<'_, Result<Value, ExecutorFailure>> {
            Box::pin(async move { Ok(json!({ "data": { "query": op.query } })) })
        }
    }

    #[tokio::test]
    async fn event_is_handled_through_pipeline() {
        let pipeline = Pipeline::new(InvocationAdapter, Arc::new(Echo));
        let event = LambdaEvent::new(
            json!({
                "method": "GET",
                "rawPath": "/graphql",
                "rawQueryString": "query=%7B+sysInfo+%7D",
                "headers": {},
                "isBase64Encoded": false
            }),
            Context::default(),
        );

        let response = handle_event(&pipeline, event).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"data":{"query":"{ sysInfo }"}}"#);
        assert!(!response.is_base64_encoded);
    }

    #[tokio::test]
    async fn malformed_event_still_returns_response() {
        let pipeline = Pipeline::new(InvocationAdapter, Arc::new(Echo));
        let event = LambdaEvent::new(json!({ "method": "GET" }), Context::default());

        let response = handle_event(&pipeline, event).await.unwrap();
        assert_eq!(response.status_code, 400);
        assert_eq!(response.headers["Content-Type"], "application/json");
    }
}
