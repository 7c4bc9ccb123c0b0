//! HTTP round trips with a uniform result contract.
//!
//! A [`Command`] sends one request through a [`Transport`](net::Transport), decides whether the
//! response is acceptable, optionally parses its body into a model, and reports the outcome as a
//! status code plus an error. Transport and parse failures get out-of-band status codes
//! ([`BAD_RESPONSE`] and [`PARSE_FAILURE`]) so they never collide with real HTTP statuses.
pub mod command;
pub mod config;
pub mod errors;
pub mod net;

pub use command::{default_is_ok, parse_json, Command, Model, BAD_RESPONSE, PARSE_FAILURE};
pub use config::TransportConfig;
pub use errors::{CommandError, ParseError, TransportError};
