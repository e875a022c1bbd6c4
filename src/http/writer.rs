use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::message::Message;

/// Serializes a request. Content-Length is the caller's business.
pub fn encode_request(req: &Message) -> Vec<u8> {
    let start_line = format!("{} {} {}\r\n", req.method, req.path, req.version);
    encode(start_line, req)
}

/// Serializes a response. The Content-Length header, if any, is written
/// as set by the caller and never recomputed.
pub fn encode_response(resp: &Message) -> Vec<u8> {
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version, resp.status_code, resp.status_message
    );
    encode(status_line, resp)
}

fn encode(start_line: String, msg: &Message) -> Vec<u8> {
    let mut buf = start_line.into_bytes();

    // Headers
    for (k, v) in &msg.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(msg.body.as_bytes());

    buf
}

/// Encoded message plus how much of it has reached the peer.
pub struct MessageWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl MessageWriter {
    pub fn request(request: &Message) -> Self {
        Self::from_bytes(encode_request(request))
    }

    pub fn response(response: &Message) -> Self {
        Self::from_bytes(encode_response(response))
    }

    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        Self { buffer, written: 0 }
    }

    pub fn is_done(&self) -> bool {
        self.written >= self.buffer.len()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
