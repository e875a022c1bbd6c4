use std::sync::Arc;

use bytes::BytesMut;
use rand::rngs::StdRng;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::Mutex;

use crate::http::message::Message;
use crate::http::parser::{ParseError, ParseMode, decode_request};
use crate::http::writer::MessageWriter;
use crate::session::server::{SessionIssuer, bad_request};

pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Issuer shared by every connection task. Cookie stores are never shared.
pub type SharedIssuer = Arc<Mutex<SessionIssuer<StdRng>>>;

/// How a [`read_until`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The delimiter is in the buffer.
    Complete,
    /// The peer closed first; the buffer holds whatever arrived.
    Truncated,
}

/// Reads into `buf` until it contains `delimiter` or the peer closes.
///
/// A short read is not an error. Buffering more than `limit` bytes without
/// seeing the delimiter is.
pub async fn read_until<R>(
    reader: &mut R,
    buf: &mut BytesMut,
    delimiter: &[u8],
    limit: usize,
) -> anyhow::Result<Framing>
where
    R: AsyncRead + Unpin,
{
    loop {
        if buf.windows(delimiter.len()).any(|w| w == delimiter) {
            return Ok(Framing::Complete);
        }

        // Prevent unbounded header growth
        if buf.len() > limit {
            anyhow::bail!("no end of headers within {} bytes", limit);
        }

        let n = reader.read_buf(buf).await?;
        if n == 0 {
            return Ok(Framing::Truncated);
        }
    }
}

/// One accepted connection: a single request in, a single response out.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    issuer: SharedIssuer,
    mode: ParseMode,
    max_header_bytes: usize,
}

pub enum ConnectionState {
    Reading,
    Processing(Message),
    Writing(MessageWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, issuer: SharedIssuer, mode: ParseMode, max_header_bytes: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            issuer,
            mode,
            max_header_bytes,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(Ok(req)) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Rejecting malformed request");
                        let writer = MessageWriter::response(&bad_request(&e));
                        self.state = ConnectionState::Writing(writer);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = self.issuer.lock().await.respond(req);
                    let writer = MessageWriter::response(&response);
                    self.state = ConnectionState::Writing(writer);
                }

                // No keep-alive: one exchange per connection
                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// `None` when the peer closed without sending anything.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Result<Message, ParseError>>> {
        let framing = read_until(
            &mut self.stream,
            &mut self.buffer,
            HEADER_TERMINATOR,
            self.max_header_bytes,
        )
        .await?;

        if self.buffer.is_empty() {
            return Ok(None);
        }

        if framing == Framing::Truncated {
            tracing::warn!(
                bytes = self.buffer.len(),
                "Peer closed before end of headers, decoding what arrived"
            );
        }

        let result = decode_request(&self.buffer, self.mode);
        self.buffer.clear();
        Ok(Some(result))
    }
}
