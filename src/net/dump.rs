//! Wire-format-ish rendering of requests and responses for diagnostics.
//!
//! The output looks like what goes over an HTTP/1.x connection: a start line, headers, a blank
//! line and optionally the body. It is meant for humans; nothing parses it back. Header values
//! that are not valid UTF-8 are rendered lossily.
use http::header::HOST;
use http::HeaderMap;

use crate::net::{Request, Response};

/// Renders `request`, including its body when `body` is set.
///
/// A `Host` header is derived from the URI authority when the request does not carry one. Only
/// headers set on the request itself are shown; defaults the transport adds while sending (user
/// agent, `Accept-Encoding`, ...) are not.
pub fn dump_request(request: &Request, body: bool) -> Vec<u8> {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .filter(|pq| !pq.is_empty())
        .unwrap_or("/");

    let mut out = format!("{} {} {:?}\r\n", request.method(), target, request.version()).into_bytes();
    if !request.headers().contains_key(HOST) {
        if let Some(authority) = request.uri().authority() {
            out.extend_from_slice(format!("Host: {}\r\n", authority).as_bytes());
        }
    }
    write_headers(&mut out, request.headers());
    out.extend_from_slice(b"\r\n");

    if body {
        out.extend_from_slice(request.body());
    }
    out
}

/// Renders `response`, including the unread part of its body when `body` is set.
///
/// A body that was already taken by a parser renders as nothing.
pub fn dump_response(response: &Response, body: bool) -> Vec<u8> {
    let mut out = format!(
        "{:?} {} {}\r\n",
        response.version, response.status, response.status_text
    )
    .into_bytes();
    write_headers(&mut out, &response.headers);
    out.extend_from_slice(b"\r\n");

    if body {
        if let Some(b) = &response.body {
            out.extend_from_slice(b.remaining());
        }
    }
    out
}

fn write_headers(out: &mut Vec<u8>, headers: &HeaderMap) {
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        out.extend_from_slice(format!("{}: {}\r\n", canonical_name(name.as_str()), value).as_bytes());
    }
}

// http lowercases header names; show them the way they are usually written.
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
