use crate::http::message::Message;

/// HTTP status codes the server emits.
///
/// - `Ok` (200): every well-formed (or leniently decoded) request
/// - `BadRequest` (400): request rejected by the strict parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use cookie_session::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
        }
    }

    /// Starts a response message with this status line.
    pub fn into_message(self) -> Message {
        Message::response(self.as_u16().to_string(), self.reason_phrase())
    }
}

/// Plain-text response with Content-Type and Content-Length filled in.
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Message {
    let mut response = status
        .into_message()
        .with_header("Content-Type", "text/plain")
        .with_body(body);
    response.set_content_length();
    response
}
