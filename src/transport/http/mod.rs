//! Minimal HTTP/1.1 transport (GET only)

pub mod handler;
pub mod message;
pub mod pages;
pub mod server;
pub mod session;

pub use {
    handler::{RequestHandler, Router},
    message::{HttpRequest, HttpResponse, StatusCode},
    server::HttpServer,
    session::ConnectionSession,
};
