//! Request line parsing and response framing

use crate::core::error::{TransportError, TransportResult};

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";
/// Content type of command responses, kept as-is for existing clients
pub const TEXT_JSON: &str = "text/json";

pub const NOT_FOUND_BODY: &str = "404 Not Found: The requested resource could not be found.";
pub const REQUEST_TIMEOUT_BODY: &str =
    "408 Request Timeout: The request was not received in time.";

/// Response status codes used by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum StatusCode {
    Ok = 200,
    NotFound = 404,
    RequestTimeout = 408,
    InternalServerError = 500,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Everything after the first `?`, if present
    pub query: Option<String>,
}

impl HttpRequest {
    /// Parse a request line such as `GET /cmd/wifi?scan HTTP/1.1`
    ///
    /// The protocol version is optional and ignored. The query is everything
    /// after the first `?`, later `?` characters included.
    pub fn parse(line: &str) -> TransportResult<Self> {
        let mut parts = line.split_whitespace();
        let (method, target) = match (parts.next(), parts.next()) {
            (Some(method), Some(target)) if target.starts_with('/') => (method, target),
            _ => return Err(TransportError::MalformedRequest(line.to_string())),
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };

        Ok(Self {
            method: method.to_string(),
            path: path.to_string(),
            query,
        })
    }
}

/// Response written back on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn ok(content_type: &'static str, body: impl Into<String>) -> Self {
        Self::new(StatusCode::Ok, content_type, body)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound, TEXT_PLAIN, NOT_FOUND_BODY)
    }

    pub fn request_timeout() -> Self {
        Self::new(StatusCode::RequestTimeout, TEXT_PLAIN, REQUEST_TIMEOUT_BODY)
    }

    /// Status line, a single Content-Type header, blank line and body
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n\r\n{}",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body
        )
        .into_bytes()
    }
}
