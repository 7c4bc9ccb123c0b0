//! Minimal HTTP response model.
//!
//! This struct represents a **fully buffered** HTTP response returned by a
//! [`Transport`](crate::net::Transport). It contains the final URL (after redirects, if the
//! transport follows them), status code + reason, response headers, and the body.
//!
//! ## Notes
//! - The body is a [`Body`]: a readable stream over the buffered bytes. It is
//!   *moved out* by whoever parses it; after that the response has no body.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names.
//! - `status_text` is derived from the status code's canonical reason phrase
//!   and is `"Unknown"` for non-standard codes.
//!
use std::io::{self, Cursor, Read};

use http::{HeaderMap, StatusCode, Version};
use url::Url;

/// Simple structure for HTTP responses.
///
/// All fields reflect the **received** response as-is; no additional parsing
/// or transformation is performed by this type.
#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Protocol version the response was received with.
    pub version: Version,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Response body, `None` once it has been taken by a parser.
    pub body: Option<Body>,
}

impl Response {
    /// Creates an empty-bodied HTTP/1.1 response with the canonical reason for `status`.
    pub fn new(url: Url, status: u16) -> Self {
        Self {
            url,
            status,
            status_text: reason_phrase(status),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Some(Body::default()),
        }
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Status line as `"<code> <reason>"`, e.g. `"404 Not Found"`.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.status_text)
    }

    /// Moves the body out of the response.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}

/// Canonical reason phrase for a status code, `"Unknown"` when there is none.
pub(crate) fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
        .to_string()
}

/// Readable body stream over buffered bytes.
///
/// Reading advances the stream; [`Body::remaining`] exposes what has not been read yet.
/// Dropping the body releases it.
#[derive(Debug, Default)]
pub struct Body {
    inner: Cursor<Vec<u8>>,
}

impl Body {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { inner: Cursor::new(bytes.into()) }
    }

    /// Bytes that have not been read yet.
    pub fn remaining(&self) -> &[u8] {
        let buf = self.inner.get_ref();
        let pos = (self.inner.position() as usize).min(buf.len());
        &buf[pos..]
    }

    /// Consumes the body, returning the unread bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        let pos = self.inner.position() as usize;
        let mut buf = self.inner.into_inner();
        buf.drain(..pos.min(buf.len()));
        buf
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::new(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::new(bytes)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::new(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn status_line_uses_canonical_reason() {
        assert_eq!(Response::new(url(), 404).status_line(), "404 Not Found");
        assert_eq!(Response::new(url(), 200).status_line(), "200 OK");
        assert_eq!(Response::new(url(), 599).status_line(), "599 Unknown");
    }

    #[test]
    fn take_body_leaves_none() {
        let mut resp = Response::new(url(), 200).with_body("hello");
        let body = resp.take_body().unwrap();
        assert_eq!(body.into_bytes(), b"hello");
        assert!(resp.body.is_none());
        assert!(resp.take_body().is_none());
    }

    #[test]
    fn body_reads_advance_remaining() {
        let mut body = Body::from("abcdef");
        let mut buf = [0u8; 2];
        body.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ab");
        assert_eq!(body.remaining(), b"cdef");
        assert_eq!(body.into_bytes(), b"cdef");
    }
}
