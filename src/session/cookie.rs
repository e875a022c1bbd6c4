//! Cookie storage for one session.

use std::collections::HashMap;

/// Cookie name → value. Attributes such as `Max-Age` or `Path` are never
/// kept, and nothing ever expires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieStore {
    cookies: HashMap<String, String>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a cookie, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// `None` if the cookie was never set; `Some("")` if it was set empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Extracts `(name, value)` from a `Set-Cookie` header value.
///
/// Everything from the first `;` on is dropped, then the rest is split at the
/// first `=`. Returns `None` when there is no `=`.
///
/// ```
/// # use cookie_session::session::cookie::parse_set_cookie;
/// assert_eq!(
///     parse_set_cookie("session_id=abc123; Max-Age=3600; Path=/"),
///     Some(("session_id".to_string(), "abc123".to_string()))
/// );
/// assert_eq!(parse_set_cookie("garbage; Path=/"), None);
/// ```
pub fn parse_set_cookie(header_value: &str) -> Option<(String, String)> {
    let pair = header_value
        .split_once(';')
        .map_or(header_value, |(pair, _attributes)| pair);

    let (name, value) = pair.split_once('=')?;
    Some((name.to_string(), value.to_string()))
}
