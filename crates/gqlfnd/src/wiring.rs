//! Startup wiring: pick the adapter pair for the runtime mode and run it.

use std::sync::Arc;

use anyhow::Context;
use gqlfn_core::mode::INVOCATION_SIGNAL;
use gqlfn_core::{Executor, Pipeline, RuntimeMode, StartupError};
use gqlfn_executor::SchemaExecutor;
use gqlfn_invoke::InvocationAdapter;
use gqlfn_trigger::{HttpTrigger, LocalHttpAdapter};
use tokio::sync::watch;
use tracing::{error, info};

use crate::{ModeArg, ServeArgs};

/// Combine the `--mode` flag with the detected mode.
///
/// `auto` takes the detected mode as is. `local` always wins, even when the
/// invocation signal is present, so the invocation host's environment can
/// be reproduced on a workstation. `invocation` requires the signal.
pub fn resolve_mode(
    requested: ModeArg,
    detected: Result<RuntimeMode, StartupError>,
) -> Result<RuntimeMode, StartupError> {
    match requested {
        ModeArg::Auto => detected,
        ModeArg::Local => Ok(RuntimeMode::LocalHttp),
        ModeArg::Invocation => match detected? {
            RuntimeMode::FunctionInvocation => Ok(RuntimeMode::FunctionInvocation),
            RuntimeMode::LocalHttp => Err(StartupError::Wiring(format!(
                "function-invocation mode requires {INVOCATION_SIGNAL} to be set"
            ))),
        },
    }
}

pub async fn run(mode: RuntimeMode, args: ServeArgs) -> anyhow::Result<()> {
    info!(%mode, "gqlfnd starting");
    let executor: Arc<dyn Executor> = Arc::new(SchemaExecutor::example());

    match mode {
        RuntimeMode::LocalHttp => run_local(executor, args).await,
        RuntimeMode::FunctionInvocation => run_invocation(executor, args).await,
    }
}

async fn run_local(executor: Arc<dyn Executor>, args: ServeArgs) -> anyhow::Result<()> {
    let pipeline = Arc::new(Pipeline::new(LocalHttpAdapter, executor).with_graphql_path(args.path));
    let trigger = HttpTrigger::new(args.bind, pipeline).with_max_body_bytes(args.max_body_bytes);
    let listener = trigger.bind().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(e) => error!(error = %e, "failed to listen for Ctrl-C"),
        }
        let _ = shutdown_tx.send(true);
    });

    trigger.serve_on(listener, shutdown_rx).await?;
    info!("gqlfnd stopped");
    Ok(())
}

async fn run_invocation(executor: Arc<dyn Executor>, args: ServeArgs) -> anyhow::Result<()> {
    let pipeline =
        Arc::new(Pipeline::new(InvocationAdapter, executor).with_graphql_path(args.path));
    gqlfn_invoke::run(pipeline)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("function-invocation runtime failed")
}
