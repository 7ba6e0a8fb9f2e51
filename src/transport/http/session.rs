//! Per-connection session: bounded request head reading and response writing

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    core::{
        error::{TransportError, TransportResult},
        types::ConnectionId,
    },
    transport::http::message::HttpResponse,
};

/// Longest accepted request or header line, terminator included
pub const MAX_LINE_BYTES: usize = 2048;

/// Most header lines read before the request is rejected
pub const MAX_HEADER_LINES: usize = 64;

/// One accepted client connection
#[derive(Debug)]
pub struct ConnectionSession<S> {
    id: ConnectionId,
    stream: BufReader<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> ConnectionSession<S> {
    pub fn new(stream: S) -> Self {
        Self {
            id: ConnectionId::new(),
            stream: BufReader::new(stream),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Read the request line and discard headers up to the blank line
    ///
    /// Returns `None` when the client closed the connection before sending
    /// anything.
    pub async fn read_request_head(&mut self) -> TransportResult<Option<String>> {
        let request_line = match self.read_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };

        let mut headers = 0;
        while let Some(line) = self.read_line().await? {
            if line.is_empty() {
                break;
            }
            headers += 1;
            if headers > MAX_HEADER_LINES {
                return Err(TransportError::MalformedRequest(format!(
                    "more than {} header lines",
                    MAX_HEADER_LINES
                )));
            }
        }

        Ok(Some(request_line))
    }

    /// [`read_request_head`](Self::read_request_head) bounded by `limit`
    pub async fn read_request_head_within(
        &mut self,
        limit: Duration,
    ) -> TransportResult<Option<String>> {
        tokio::time::timeout(limit, self.read_request_head())
            .await
            .map_err(|_| TransportError::RequestTimeout(limit))?
    }

    /// Read the next line without its terminator
    async fn read_line(&mut self) -> TransportResult<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = (&mut self.stream)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await?;

        if bytes_read == 0 {
            // EOF - connection closed
            return Ok(None);
        }

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        } else if bytes_read == MAX_LINE_BYTES {
            return Err(TransportError::MalformedRequest(format!(
                "line longer than {} bytes",
                MAX_LINE_BYTES
            )));
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Write the whole response in one buffered send
    pub async fn send_response(&mut self, response: &HttpResponse) -> TransportResult<()> {
        let stream = self.stream.get_mut();
        stream.write_all(&response.to_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Close the write side of the connection
    pub async fn close(mut self) -> TransportResult<()> {
        self.stream.get_mut().shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::http::message::TEXT_PLAIN;
    use pretty_assertions::assert_eq;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let first = ConnectionSession::new(Builder::new().build());
        let second = ConnectionSession::new(Builder::new().build());
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn test_read_request_head_discards_headers() {
        let stream = Builder::new()
            .read(b"GET /dht11 HTTP/1.1\r\n")
            .read(b"Host: 192.168.1.1\r\nAccept: */*\r\n")
            .read(b"\r\n")
            .build();
        let mut session = ConnectionSession::new(stream);

        let line = session.read_request_head().await.unwrap();
        assert_eq!(line.as_deref(), Some("GET /dht11 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_read_request_head_accepts_bare_newlines() {
        let stream = Builder::new().read(b"GET / HTTP/1.0\nHost: x\n\n").build();
        let mut session = ConnectionSession::new(stream);

        let line = session.read_request_head().await.unwrap();
        assert_eq!(line.as_deref(), Some("GET / HTTP/1.0"));
    }

    #[tokio::test]
    async fn test_read_request_head_eof_before_request() {
        let mut session = ConnectionSession::new(Builder::new().build());
        assert_eq!(session.read_request_head().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_request_head_eof_inside_headers() {
        let stream = Builder::new().read(b"GET / HTTP/1.1\r\nHost: x\r\n").build();
        let mut session = ConnectionSession::new(stream);

        let line = session.read_request_head().await.unwrap();
        assert_eq!(line.as_deref(), Some("GET / HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_read_request_head_rejects_long_line() {
        let long_line = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE_BYTES));
        let stream = Builder::new().read(long_line.as_bytes()).build();
        let mut session = ConnectionSession::new(stream);

        assert!(matches!(
            session.read_request_head().await,
            Err(TransportError::MalformedRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_read_request_head_rejects_header_flood() {
        let mut request = String::from("GET / HTTP/1.1\r\n");
        for i in 0..=MAX_HEADER_LINES {
            request.push_str(&format!("X-Header-{}: v\r\n", i));
        }
        request.push_str("\r\n");
        let stream = Builder::new().read(request.as_bytes()).build();
        let mut session = ConnectionSession::new(stream);

        assert!(matches!(
            session.read_request_head().await,
            Err(TransportError::MalformedRequest(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_request_head_times_out() {
        let (_client, server) = tokio::io::duplex(64);
        let mut session = ConnectionSession::new(server);

        let result = session
            .read_request_head_within(Duration::from_secs(10))
            .await;

        assert!(matches!(result, Err(TransportError::RequestTimeout(_))));
    }

    #[tokio::test]
    async fn test_send_response() {
        let stream = Builder::new()
            .write(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello")
            .build();
        let mut session = ConnectionSession::new(stream);

        session
            .send_response(&HttpResponse::ok(TEXT_PLAIN, "hello"))
            .await
            .unwrap();
        session.close().await.unwrap();
    }
}
