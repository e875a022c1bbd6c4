//! Session client.
//!
//! Opens a fresh TCP connection per request, sends `GET /`, and feeds the
//! response through the [`ClientSession`] so the session cookie is replayed
//! on the next request. Nothing is retried: the first transport failure ends
//! the run.

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::Config;
use crate::http::connection::{Framing, HEADER_TERMINATOR, read_until};
use crate::http::message::Message;
use crate::http::parser::{ParseMode, decode_response, find_headers_end};
use crate::http::writer::MessageWriter;
use crate::session::client::ClientSession;
use crate::session::cookie::CookieStore;

const BUFFER_SIZE: usize = 4096;

pub struct Client {
    addr: String,
    session: ClientSession,
    mode: ParseMode,
    requests: usize,
    interval: Duration,
    connect_timeout: Duration,
    max_header_bytes: usize,
    max_body_bytes: usize,
}

impl Client {
    pub fn new(cfg: &Config) -> Result<Self> {
        let host = cfg.client.host_header()?;

        Ok(Self {
            addr: cfg.client.connect_addr()?,
            session: ClientSession::new(host, cfg.session.cookie_name.clone()),
            mode: cfg.parser.mode(),
            requests: cfg.client.requests,
            interval: Duration::from_millis(cfg.client.interval_ms),
            connect_timeout: Duration::from_millis(cfg.client.connect_timeout_ms),
            max_header_bytes: cfg.client.max_header_bytes,
            max_body_bytes: cfg.client.max_body_bytes,
        })
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// Sends the configured number of requests, pausing between them.
    pub async fn run(&mut self) -> Result<Vec<Message>> {
        let mut responses = Vec::with_capacity(self.requests);

        for i in 0..self.requests {
            if i > 0 {
                tokio::time::sleep(self.interval).await;
            }

            tracing::info!(request = i + 1, addr = %self.addr, "Sending request");
            let response = self
                .send_request()
                .await
                .with_context(|| format!("request {} failed", i + 1))?;
            responses.push(response);
        }

        Ok(responses)
    }

    /// One connect → write → read exchange.
    pub async fn send_request(&mut self) -> Result<Message> {
        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .context("Connection timeout")?
            .context("Failed to connect to server")?;

        let request = self.session.build_request();
        MessageWriter::request(&request)
            .write_to_stream(&mut stream)
            .await
            .context("Failed to send request")?;

        let raw = self.read_response(&mut stream).await?;
        let response = self
            .session
            .absorb_response(&raw, self.mode)
            .context("Failed to decode response")?;

        tracing::info!(
            status = %response.status_code,
            reason = %response.status_message,
            body = %response.body.trim_end(),
            "Response received"
        );

        Ok(response)
    }

    /// Reads the header block, then the body up to Content-Length.
    async fn read_response<R>(&self, stream: &mut R) -> Result<BytesMut>
    where
        R: AsyncRead + Unpin,
    {
        let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

        let framing = read_until(stream, &mut buffer, HEADER_TERMINATOR, self.max_header_bytes)
            .await
            .context("Failed to receive response")?;

        if framing == Framing::Truncated {
            tracing::warn!(bytes = buffer.len(), "Server closed before end of headers");
            return Ok(buffer);
        }

        let Some(headers_end) = find_headers_end(&buffer) else {
            return Ok(buffer);
        };
        let body_start = headers_end + HEADER_TERMINATOR.len();
        let body_len = declared_body_len(&buffer[..body_start]);
        if body_len > self.max_body_bytes {
            anyhow::bail!(
                "response Content-Length {} exceeds limit of {} bytes",
                body_len,
                self.max_body_bytes
            );
        }
        let expected = body_start
            .checked_add(body_len)
            .context("response Content-Length overflows")?;

        while buffer.len() < expected {
            let n = stream.read_buf(&mut buffer).await?;
            if n == 0 {
                tracing::warn!(
                    received = buffer.len() - body_start,
                    expected = expected - body_start,
                    "Server closed before complete body received"
                );
                break;
            }
        }

        // Never hand back bytes past the declared body
        buffer.truncate(expected);
        Ok(buffer)
    }
}

/// Content-Length of a raw header block, read through the response decoder.
///
/// Cookies are extracted again when the whole response is absorbed, so the
/// store used here is thrown away.
fn declared_body_len(head: &[u8]) -> usize {
    decode_response(head, ParseMode::Lenient, &mut CookieStore::new())
        .map(|head| head.content_length())
        .unwrap_or(0)
}
