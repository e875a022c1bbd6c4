use thiserror::Error;

use crate::http::message::Message;
use crate::session::cookie::{CookieStore, parse_set_cookie};

/// How decoders treat input that does not fit the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Best effort: missing fields stay empty, bad lines are skipped.
    #[default]
    Lenient,
    /// Any deviation is reported as a [`ParseError`].
    Strict,
}

/// Errors reported by the decoders. Lenient mode never produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("header block is not terminated by a blank line")]
    Incomplete,
    #[error("message is not valid UTF-8")]
    InvalidUtf8,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("malformed Set-Cookie value: {0:?}")]
    MalformedCookie(String),
}

/// Decodes a request from a buffer holding at least the full header block.
///
/// Anything after the blank line is taken as the body as-is; no
/// Content-Length bookkeeping happens here.
pub fn decode_request(buf: &[u8], mode: ParseMode) -> Result<Message, ParseError> {
    let (head, body) = split_message(buf, mode)?;
    let mut lines = head.split("\r\n");

    let mut request = Message::default();

    // Request line
    let request_line = lines.next().unwrap_or("");
    let parts: Vec<&str> = request_line.split(' ').collect();
    if mode == ParseMode::Strict && (parts.len() != 3 || parts.iter().any(|p| p.is_empty())) {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    }
    request.method = token(&parts, 0);
    request.path = token(&parts, 1);
    request.version = token(&parts, 2);

    // Headers
    for line in lines {
        if is_end_of_headers(line) {
            break;
        }
        if let Some((key, value)) = parse_header_line(line, mode)? {
            request.set_header(key, value);
        }
    }

    request.body = body;
    Ok(request)
}

/// Decodes a response and records every `Set-Cookie` it carries in `cookies`.
pub fn decode_response(
    buf: &[u8],
    mode: ParseMode,
    cookies: &mut CookieStore,
) -> Result<Message, ParseError> {
    let (head, body) = split_message(buf, mode)?;
    let mut lines = head.split("\r\n");

    let mut response = Message::default();

    // Status line; the reason phrase may contain spaces
    let status_line = lines.next().unwrap_or("");
    let parts: Vec<&str> = status_line.splitn(3, ' ').collect();
    if mode == ParseMode::Strict && (parts.len() != 3 || parts[..2].iter().any(|p| p.is_empty())) {
        return Err(ParseError::MalformedStatusLine(status_line.to_string()));
    }
    response.version = token(&parts, 0);
    response.status_code = token(&parts, 1);
    response.status_message = token(&parts, 2);

    // Headers
    for line in lines {
        if is_end_of_headers(line) {
            break;
        }
        let Some((key, value)) = parse_header_line(line, mode)? else {
            continue;
        };

        if key == "Set-Cookie" {
            match parse_set_cookie(value) {
                Some((name, cookie_value)) => cookies.set(name, cookie_value),
                None if mode == ParseMode::Strict => {
                    return Err(ParseError::MalformedCookie(value.to_string()));
                }
                None => tracing::debug!(value, "Ignoring Set-Cookie without name=value"),
            }
        }

        response.set_header(key, value);
    }

    response.body = body;
    Ok(response)
}

/// Position of the `\r\n\r\n` that ends the header block.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Splits the buffer into header block text and body text.
fn split_message(buf: &[u8], mode: ParseMode) -> Result<(String, String), ParseError> {
    let (head, body): (&[u8], &[u8]) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + 4..]),
        None if mode == ParseMode::Strict => return Err(ParseError::Incomplete),
        None => (buf, &[]),
    };

    Ok((to_text(head, mode)?, to_text(body, mode)?))
}

fn to_text(bytes: &[u8], mode: ParseMode) -> Result<String, ParseError> {
    match mode {
        ParseMode::Strict => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| ParseError::InvalidUtf8),
        ParseMode::Lenient => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn token(parts: &[&str], index: usize) -> String {
    parts.get(index).copied().unwrap_or("").to_string()
}

fn is_end_of_headers(line: &str) -> bool {
    line.is_empty() || line == "\r"
}

/// Splits `Name: value` on the first colon.
///
/// The value starts two characters after the colon, skipping the
/// conventional space. A trailing `\r` is dropped.
fn parse_header_line(line: &str, mode: ParseMode) -> Result<Option<(&str, &str)>, ParseError> {
    let Some(colon) = line.find(':') else {
        if mode == ParseMode::Strict {
            return Err(ParseError::MalformedHeader(line.to_string()));
        }
        tracing::debug!(line, "Skipping header line without colon");
        return Ok(None);
    };

    let key = &line[..colon];
    if mode == ParseMode::Strict && (key.is_empty() || !line[colon + 1..].starts_with(' ')) {
        return Err(ParseError::MalformedHeader(line.to_string()));
    }

    let value = line.get(colon + 2..).unwrap_or("");
    let value = value.strip_suffix('\r').unwrap_or(value);
    Ok(Some((key, value)))
}
