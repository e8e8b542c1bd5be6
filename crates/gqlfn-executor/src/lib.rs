//! gqlfn-executor — the async-graphql side of the pipeline.
//!
//! Provides the example schema and [`SchemaExecutor`], the
//! [`gqlfn_core::Executor`] implementation that runs operations against it.

pub mod schema;

use async_graphql::{ObjectType, Request, Schema, SubscriptionType, Variables};
use gqlfn_core::{BoxFuture, Executor, ExecutorFailure, GraphQLOperation};
use serde_json::Value;
use tracing::debug;

pub use schema::{AppSchema, QueryRoot, build_schema};

/// Executes operations against an `async_graphql::Schema`.
pub struct SchemaExecutor<Query, Mutation, Subscription> {
    schema: Schema<Query, Mutation, Subscription>,
}

impl<Query, Mutation, Subscription> SchemaExecutor<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    pub fn new(schema: Schema<Query, Mutation, Subscription>) -> Self {
        Self { schema }
    }

    /// The schema in SDL form.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl SchemaExecutor<QueryRoot, async_graphql::EmptyMutation, async_graphql::EmptySubscription> {
    /// An executor over the bundled example schema.
    pub fn example() -> Self {
        Self::new(build_schema())
    }
}

impl<Query, Mutation, Subscription> Executor for SchemaExecutor<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    fn execute(&self, operation: GraphQLOperation) -> BoxFuture<'_, Result<Value, ExecutorFailure>> {
        Box::pin(async move {
            let mut request = Request::new(operation.query)
                .variables(Variables::from_json(Value::Object(operation.variables)));
            if let Some(name) = operation.operation_name {
                request = request.operation_name(name);
            }

            let response = self.schema.execute(request).await;
            debug!(errors = response.errors.len(), "operation executed");

            serde_json::to_value(&response)
                .map_err(|e| ExecutorFailure::new(format!("failed to encode response: {e}")))
        })
    }
}
