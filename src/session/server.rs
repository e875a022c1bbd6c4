//! Server half of the session protocol.
//!
//! The server is stateless: every response carries a freshly minted session
//! id, whether or not the request presented one. The incoming cookie is only
//! echoed back in the greeting, never looked up or validated.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::SessionConfig;
use crate::http::message::Message;
use crate::http::parser::ParseError;
use crate::http::response::{StatusCode, text_response};

pub const FIRST_VISIT_BODY: &str = "Hello! This is your first visit.\n";

/// Mints session ids and builds session responses.
///
/// The random source is owned by the issuer, so tests can seed it.
pub struct SessionIssuer<R> {
    config: SessionConfig,
    rng: R,
}

impl SessionIssuer<StdRng> {
    pub fn from_entropy(config: SessionConfig) -> Self {
        Self::new(config, StdRng::from_entropy())
    }

    /// Deterministic issuer: the same seed yields the same id sequence.
    pub fn seeded(config: SessionConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> SessionIssuer<R> {
    pub fn new(config: SessionConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Returns an opaque token such as `user_1804289383`. Not guaranteed unique.
    pub fn issue(&mut self) -> String {
        let n = self.rng.next_u32() & 0x7fff_ffff;
        format!("{}{}", self.config.id_prefix, n)
    }

    /// The `Set-Cookie` value for `token`.
    pub fn set_cookie_value(&self, token: &str) -> String {
        format!(
            "{}={}; Max-Age={}; Path={}",
            self.config.cookie_name, token, self.config.max_age, self.config.path
        )
    }

    /// Builds the 200 response for a decoded request.
    pub fn respond(&mut self, request: &Message) -> Message {
        let token = self.issue();

        let body = match request.header("Cookie") {
            Some(cookie) => format!("Welcome back! Your cookie: {}\n", cookie),
            None => FIRST_VISIT_BODY.to_string(),
        };

        let mut response = text_response(StatusCode::Ok, body);
        response.set_header("Set-Cookie", self.set_cookie_value(&token));

        tracing::info!(
            path = %request.path,
            returning = request.header("Cookie").is_some(),
            session_id = %token,
            "Issued session cookie"
        );

        response
    }
}

/// Response for a request the strict parser refused.
pub fn bad_request(err: &ParseError) -> Message {
    text_response(StatusCode::BadRequest, format!("400 Bad Request: {}\n", err))
}
