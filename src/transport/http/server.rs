//! HTTP connection server
//!
//! Connections are served one at a time, start to finish, in accept order.

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
};
use tracing::{debug, info, warn};

use crate::{
    core::error::{TransportError, TransportResult},
    transport::http::{
        handler::RequestHandler,
        message::{HttpRequest, HttpResponse},
        session::ConnectionSession,
    },
};

/// Default bound on receiving a complete request head
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept loop delegating every request to a [`RequestHandler`]
pub struct HttpServer<H: RequestHandler> {
    listener: TcpListener,
    handler: Arc<H>,
    read_timeout: Duration,
}

impl<H: RequestHandler> HttpServer<H> {
    /// Bind a new listener
    pub async fn bind(
        addr: SocketAddr,
        handler: Arc<H>,
        read_timeout: Duration,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener, handler, read_timeout))
    }

    /// Serve on an already bound listener (e.g. from socket activation)
    pub fn from_listener(listener: TcpListener, handler: Arc<H>, read_timeout: Duration) -> Self {
        Self {
            listener,
            handler,
            read_timeout,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop; it never returns
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!("HTTP server listening on {}", addr);
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let session = ConnectionSession::new(stream);
                    let id = session.id();
                    info!(%id, %peer, "Client connected");

                    if let Err(e) = self.serve(session).await {
                        warn!(%id, "Error serving client: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Serve exactly one request on a connection and close it
    pub async fn serve<S>(&self, mut session: ConnectionSession<S>) -> TransportResult<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let id = session.id();

        let response = match session.read_request_head_within(self.read_timeout).await {
            Ok(Some(line)) => {
                debug!(%id, request_line = %line, "Request received");
                self.respond(&line).await
            }
            Ok(None) => {
                debug!(%id, "Client closed before sending a request");
                return Ok(());
            }
            Err(TransportError::RequestTimeout(limit)) => {
                warn!(%id, ?limit, "Client did not send a request in time");
                HttpResponse::request_timeout()
            }
            Err(TransportError::MalformedRequest(reason)) => {
                debug!(%id, %reason, "Malformed request");
                HttpResponse::not_found()
            }
            Err(e) => return Err(e),
        };

        debug!(%id, status = response.status.code(), "Sending response");
        session.send_response(&response).await?;
        session.close().await
    }

    async fn respond(&self, request_line: &str) -> HttpResponse {
        match HttpRequest::parse(request_line) {
            Ok(request) => self.handler.handle(request).await,
            Err(e) => {
                debug!("{}", e);
                HttpResponse::not_found()
            }
        }
    }
}
