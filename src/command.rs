//! Round-trip command.
//!
//! A [`Command`] wraps a single HTTP exchange and normalizes its outcome into a status code plus
//! an error:
//!
//! | outcome                                  | status              | error                    |
//! |------------------------------------------|---------------------|--------------------------|
//! | transport failed, no response            | [`BAD_RESPONSE`]    | the transport error      |
//! | response rejected by the `is_ok` check   | real status         | the status line          |
//! | body could not be parsed into the model  | [`PARSE_FAILURE`]   | the parse error          |
//! | anything else                            | real status         | none                     |
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), trip::CommandError> {
//! #[derive(serde::Deserialize, Default)]
//! struct Trip { name: String }
//!
//! let mut cmd = trip::Command::get("http://example.com/trip").expect("valid url");
//! let mut model = Trip::default();
//! match cmd.output(&mut model).await {
//!     Ok(status) => println!("{status}: {}", model.name),
//!     Err(e) => eprintln!("{}: {e}", e.status_code()),
//! }
//! # Ok(()) }
//! ```
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::errors::{CommandError, ParseError, TransportError};
use crate::net::dump::{dump_request, dump_response};
use crate::net::{default_transport, Body, Request, Response, Transport};

/// Status returned when the request could not be sent or no response was received.
pub const BAD_RESPONSE: u16 = 590;

/// Status returned when the response body could not be parsed into the model.
pub const PARSE_FAILURE: u16 = 591;

/// Decides whether a response counts as a success before its body is parsed.
pub type IsOk = Box<dyn Fn(Option<&Response>) -> bool + Send + Sync>;

/// Turns a body into a model. Owns the body, so it is released on every return path.
pub type Parse = Box<dyn Fn(Body, &mut dyn Model) -> Result<(), ParseError> + Send + Sync>;

/// Destination of a parsed response body.
///
/// Implemented for every type that can be deserialized by serde. A model is replaced as a whole,
/// and only when decoding succeeded.
pub trait Model: Send {
    /// Decodes JSON bytes straight into the model.
    fn populate_from_slice(&mut self, bytes: &[u8]) -> Result<(), ParseError>;

    /// Fills the model from an already decoded value, for parsers that build one themselves.
    fn populate(&mut self, value: serde_json::Value) -> Result<(), ParseError>;
}

impl<T: DeserializeOwned + Send> Model for T {
    fn populate_from_slice(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }

    fn populate(&mut self, value: serde_json::Value) -> Result<(), ParseError> {
        *self = serde_json::from_value(value)?;
        Ok(())
    }
}

/// Default acceptability check: a response must exist and have a status below 400.
pub fn default_is_ok(response: Option<&Response>) -> bool {
    response.is_some_and(|r| r.status < 400)
}

/// Default parser: reads the whole body and decodes it as JSON into the model.
pub fn parse_json(mut body: Body, model: &mut dyn Model) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    body.read_to_end(&mut buf)?;
    drop(body);

    model.populate_from_slice(&buf)
}

/// A single request/response round trip.
///
/// Not meant to be executed concurrently: running it again overwrites the stored response and
/// last error. Use one command per request and share the [`Transport`] instead.
pub struct Command {
    transport: Arc<dyn Transport>,
    request: Option<Request>,
    response: Option<Response>,
    is_ok: IsOk,
    parse: Parse,
    last_error: Option<CommandError>,
}

impl Default for Command {
    /// A command without a request. It can be dumped, running it fails with
    /// [`TransportError::MissingRequest`].
    fn default() -> Self {
        Self {
            transport: default_transport(),
            request: None,
            response: None,
            is_ok: Box::new(default_is_ok),
            parse: Box::new(parse_json),
            last_error: None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// Creates a command using the default transport, [`default_is_ok`] and [`parse_json`].
    pub fn new(request: Request) -> Self {
        Self {
            request: Some(request),
            ..Self::default()
        }
    }

    /// Creates a command for a GET request with an empty body.
    pub fn get(url: &str) -> Result<Self, TransportError> {
        let request = http::Request::get(url)
            .body(Vec::new())
            .map_err(|e| TransportError::InvalidRequest(format!("{url}: {e}")))?;
        Ok(Self::new(request))
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_is_ok<F>(mut self, is_ok: F) -> Self
    where
        F: Fn(Option<&Response>) -> bool + Send + Sync + 'static,
    {
        self.is_ok = Box::new(is_ok);
        self
    }

    /// Replaces the body parser. The parser receives the body by value and must not leak it.
    pub fn with_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(Body, &mut dyn Model) -> Result<(), ParseError> + Send + Sync + 'static,
    {
        self.parse = Box::new(parse);
        self
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    pub fn request_mut(&mut self) -> Option<&mut Request> {
        self.request.as_mut()
    }

    /// Response of the last execution. `None` before the first run and when the transport failed.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.response.as_mut()
    }

    /// Error of the last execution, `None` if it succeeded or nothing ran yet.
    pub fn last_error(&self) -> Option<&CommandError> {
        self.last_error.as_ref()
    }

    /// Text of the last error, or an empty string when there is none.
    pub fn error(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Sends the request without parsing the body.
    ///
    /// The body stays on the stored [`response`](Self::response).
    pub async fn run(&mut self) -> Result<u16, CommandError> {
        self.execute(None).await
    }

    /// Sends the request and parses the body of an acceptable response into `model`.
    ///
    /// See the module docs for how outcomes map to status codes. After an error the model must not
    /// be trusted; the default parser leaves it untouched.
    pub async fn output<M: Model>(&mut self, model: &mut M) -> Result<u16, CommandError> {
        let model: &mut dyn Model = model;
        self.execute(Some(model)).await
    }

    async fn execute(&mut self, model: Option<&mut dyn Model>) -> Result<u16, CommandError> {
        let result = self.exchange(model).await;

        match &result {
            Ok(status) => log::debug!("{} -> {}", self.target(), status),
            Err(e) if e.is_transport() => log::warn!("{} failed: {}", self.target(), e),
            Err(e) => log::debug!("{} -> {}: {}", self.target(), e.status_code(), e),
        }

        self.last_error = result.as_ref().err().cloned();
        result
    }

    async fn exchange(&mut self, model: Option<&mut dyn Model>) -> Result<u16, CommandError> {
        self.response = None;

        let request = self.request.as_ref().ok_or(TransportError::MissingRequest)?;
        let response = self.transport.execute(request).await?;
        let response = self.response.insert(response);

        if !(self.is_ok)(Some(&*response)) {
            return Err(CommandError::Unacceptable {
                status: response.status,
                line: response.status_line(),
            });
        }

        let status = response.status;
        if let Some(model) = model {
            let body = response.take_body().unwrap_or_default();
            (self.parse)(body, model)?;
        }
        Ok(status)
    }

    fn target(&self) -> String {
        match &self.request {
            Some(r) => format!("{} {}", r.method(), r.uri()),
            None => "<no request>".to_string(),
        }
    }

    /// Writes the request and then the response, each followed by a newline.
    ///
    /// Missing parts are skipped. The request is shown as held by the command, without headers the
    /// transport adds on the wire. Bodies are included when `body` is set; a body that was already
    /// parsed is gone and renders as nothing. Write failures are ignored.
    pub fn dump<W: Write + ?Sized>(&self, w: &mut W, body: bool) {
        if let Some(request) = &self.request {
            let _ = w
                .write_all(&dump_request(request, body))
                .and_then(|_| w.write_all(b"\n"));
        }
        if let Some(response) = &self.response {
            let _ = w
                .write_all(&dump_response(response, body))
                .and_then(|_| w.write_all(b"\n"));
        }
    }
}
