use std::collections::HashMap;

pub const HTTP_VERSION: &str = "HTTP/1.1";

/// An HTTP request or response.
///
/// The same structure carries both roles: requests use `method` and `path`,
/// responses use `status_code` and `status_message`. The fields of the other
/// role are left empty and should not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Request method (requests only)
    pub method: String,
    /// Request target, e.g. "/" (requests only)
    pub path: String,
    /// Protocol version, "HTTP/1.1" unless decoded otherwise
    pub version: String,
    /// Status code as sent on the wire, e.g. "200" (responses only)
    pub status_code: String,
    /// Reason phrase, e.g. "OK" (responses only)
    pub status_message: String,
    /// Header names are case-sensitive; setting a name twice keeps the last value.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            method: String::new(),
            path: String::new(),
            version: HTTP_VERSION.to_string(),
            status_code: String::new(),
            status_message: String::new(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }
}

impl Message {
    /// Creates a request with the given start line fields.
    pub fn request(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a response with the given status line fields.
    pub fn response(status_code: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            status_message: status_message.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(key, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds or replaces a header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Parses the Content-Length header.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Sets Content-Length to the byte length of the current body.
    pub fn set_content_length(&mut self) {
        let len = self.body.len().to_string();
        self.set_header("Content-Length", len);
    }
}
