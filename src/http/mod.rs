//! HTTP/1.1 message framing.
//!
//! # Architecture
//!
//! - **`message`**: the request/response data model shared by both roles
//! - **`parser`**: decodes wire bytes into a `Message`, lenient or strict
//! - **`writer`**: encodes a `Message` into wire bytes and writes them out
//! - **`response`**: status codes the server emits
//! - **`connection`**: header framing on a byte stream and the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer until "\r\n\r\n" or peer close
//!        └──────┬──────┘
//!               │ Request decoded (or rejected in strict mode)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Mint session id, build greeting
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```
//! use cookie_session::http::parser::{decode_request, ParseMode};
//! use cookie_session::http::writer::encode_request;
//! use cookie_session::http::message::Message;
//!
//! let req = Message::request("GET", "/").with_header("Host", "127.0.0.1:8080");
//! let wire = encode_request(&req);
//! let decoded = decode_request(&wire, ParseMode::Lenient).unwrap();
//! assert_eq!(decoded, req);
//! ```

pub mod connection;
pub mod message;
pub mod parser;
pub mod response;
pub mod writer;
