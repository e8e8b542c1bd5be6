//! Local HTTP trigger.
//!
//! `HttpTrigger` runs a hyper HTTP/1.1 server and hands every request to
//! the GraphQL [`Pipeline`] through the [`LocalHttpAdapter`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use gqlfn_core::{HandlerError, Pipeline};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::convert::LocalHttpAdapter;

/// Largest request body buffered by default (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP trigger server.
///
/// Binds to a TCP port, buffers each request body up to `max_body_bytes`,
/// and passes the request through the pipeline. One tokio task is spawned
/// per connection.
pub struct HttpTrigger {
    bind_addr: SocketAddr,
    max_body_bytes: usize,
    pipeline: Arc<Pipeline<LocalHttpAdapter>>,
}

impl HttpTrigger {
    pub fn new(bind_addr: SocketAddr, pipeline: Arc<Pipeline<LocalHttpAdapter>>) -> Self {
        Self {
            bind_addr,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            pipeline,
        }
    }

    /// Cap the request body size. Larger bodies are answered with 413.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Bind the listener. Fails here rather than in [`serve_on`](Self::serve_on)
    /// so startup errors surface before the process reports readiness.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("failed to bind HTTP trigger to {}", self.bind_addr))
    }

    /// Serve on an already bound listener until the shutdown signal is received.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let local_addr = listener.local_addr().context("listener has no local address")?;
        info!(
            addr = %local_addr,
            path = self.pipeline.graphql_path(),
            max_body_bytes = self.max_body_bytes,
            "HTTP trigger listening"
        );

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, peer_addr) = accept_result.context("accept failed")?;
                    let pipeline = self.pipeline.clone();
                    let max_body_bytes = self.max_body_bytes;

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let svc = service_fn(move |req: Request<Incoming>| {
                            let pipeline = pipeline.clone();
                            async move {
                                Ok::<_, hyper::Error>(
                                    handle(&pipeline, req, peer_addr, max_body_bytes).await,
                                )
                            }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer_addr, error = %e, "connection error");
                        }
                    });
                }
                _ = shutdown.changed() => {
                    info!("HTTP trigger shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn handle(
    pipeline: &Pipeline<LocalHttpAdapter>,
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    max_body_bytes: usize,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    debug!(%peer_addr, method = %parts.method, uri = %parts.uri, "request received");

    match Limited::new(body, max_body_bytes).collect().await {
        Ok(collected) => {
            let req = Request::from_parts(parts, collected.to_bytes());
            pipeline.handle(req).await
        }
        Err(e) => {
            let err = if e.downcast_ref::<LengthLimitError>().is_some() {
                HandlerError::PayloadTooLarge(max_body_bytes)
            } else {
                HandlerError::MalformedPayload(format!("failed to read request body: {e}"))
            };
            debug!(%peer_addr, error = %e, "failed to read request body");
            pipeline.reject(&err)
        }
    }
}
