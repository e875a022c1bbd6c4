//! Cookie-based session handling.
//!
//! - **`cookie`**: the per-session cookie store and `Set-Cookie` parsing
//! - **`client`**: replays the session cookie on every request
//! - **`server`**: mints a session id for every response

pub mod client;
pub mod cookie;
pub mod server;

pub use client::{ClientSession, SessionState};
pub use cookie::CookieStore;
pub use server::SessionIssuer;
