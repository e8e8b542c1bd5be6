//! gqlfnd — the gqlfn daemon.
//!
//! Single entry point for both hosts:
//! - Local HTTP: binds a hyper listener and serves `/graphql`
//! - Function invocation: polls the dispatcher's runtime API
//!
//! The mode is detected once at startup from the environment and can be
//! forced with `--mode`.
//!
//! # Usage
//!
//! ```text
//! gqlfnd --bind 127.0.0.1:8080
//! gqlfnd schema > schema.graphql
//! ```

mod wiring;

use std::net::SocketAddr;

use clap::{Parser, Subcommand, ValueEnum};
use gqlfn_core::{DEFAULT_GRAPHQL_PATH, RuntimeMode};
use gqlfn_executor::SchemaExecutor;
use gqlfn_trigger::DEFAULT_MAX_BODY_BYTES;

#[derive(Parser)]
#[command(name = "gqlfnd", about = "GraphQL over local HTTP or function invocation", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Print the schema in SDL form and exit.
    Schema,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address the local HTTP listener binds to.
    #[arg(long, env = "GQLFN_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Path the GraphQL endpoint is served at.
    #[arg(long, env = "GQLFN_PATH", default_value = DEFAULT_GRAPHQL_PATH)]
    pub path: String,

    /// Largest request body the local HTTP listener buffers, in bytes.
    #[arg(long, env = "GQLFN_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Runtime mode. `auto` detects it from the environment.
    #[arg(long, env = "GQLFN_MODE", value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Local,
    Invocation,
}

const DEFAULT_LOG_FILTER: &str = "info,gqlfnd=debug,gqlfn_core=debug,gqlfn_trigger=debug,gqlfn_invoke=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Schema) = cli.command {
        print!("{}", SchemaExecutor::example().sdl());
        return Ok(());
    }

    let mode = wiring::resolve_mode(cli.serve.mode, RuntimeMode::detect());
    init_tracing(mode.as_ref().ok().copied())?;
    let mode = mode?;

    wiring::run(mode, cli.serve).await
}

/// Install the global subscriber. Invocation hosts capture stdout, so that
/// mode logs JSON lines without colour.
fn init_tracing(mode: Option<RuntimeMode>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    match mode {
        Some(RuntimeMode::FunctionInvocation) => tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_current_span(false)
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    Ok(())
}
