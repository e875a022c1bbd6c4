//! Cookie Session - HTTP/1.1 request/response exchange with a session cookie
//!
//! Core library for message framing, cookie handling and the session protocol.

pub mod client;
pub mod config;
pub mod http;
pub mod server;
pub mod session;
