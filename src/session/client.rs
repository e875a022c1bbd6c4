//! Client half of the session protocol.
//!
//! The client keeps one [`CookieStore`] for its whole run. Every outgoing
//! request replays the session cookie if one has been received, and every
//! decoded response may set or refresh it.

use crate::http::message::Message;
use crate::http::parser::{ParseError, ParseMode, decode_response};
use crate::session::cookie::CookieStore;

/// Whether the client has been given a session cookie yet.
///
/// Moves from `NoCookie` to `HasCookie` once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoCookie,
    HasCookie,
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    host: String,
    cookie_name: String,
    cookies: CookieStore,
    cookie_changed: bool,
}

impl ClientSession {
    /// `host` is sent verbatim as the `Host` header (`<host>:<port>`).
    pub fn new(host: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            cookie_name: cookie_name.into(),
            cookies: CookieStore::new(),
            cookie_changed: false,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.session_id() {
            Some(_) => SessionState::HasCookie,
            None => SessionState::NoCookie,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.cookies.get(&self.cookie_name)
    }

    /// Whether the last absorbed response set a different session id.
    pub fn cookie_changed(&self) -> bool {
        self.cookie_changed
    }

    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    /// Builds the next `GET /` request, attaching the session cookie if known.
    pub fn build_request(&self) -> Message {
        let mut request = Message::request("GET", "/").with_header("Host", self.host.as_str());

        if let Some(id) = self.session_id() {
            request.set_header("Cookie", format!("{}={}", self.cookie_name, id));
        }

        request
    }

    /// Decodes a response and keeps any cookies it sets.
    pub fn absorb_response(&mut self, buf: &[u8], mode: ParseMode) -> Result<Message, ParseError> {
        let before = self.session_id().map(str::to_string);
        self.cookie_changed = false;
        let response = decode_response(buf, mode, &mut self.cookies)?;

        self.cookie_changed = self.session_id() != before.as_deref();

        if let Some(id) = self.session_id().filter(|_| self.cookie_changed) {
            tracing::info!(
                cookie = %self.cookie_name,
                value = %id,
                first = before.is_none(),
                "Session cookie received"
            );
        }

        Ok(response)
    }
}
