//! Network layer: the request/response types a [`Command`](crate::Command) works with, the
//! [`Transport`] that moves them, and the diagnostic [`dump`] renderer.
pub mod dump;
mod response;
mod transport;

pub use response::{Body, Response};
pub use transport::{default_transport, ReqwestTransport, Transport};

/// Outgoing request. The body is fully buffered.
pub type Request = http::Request<Vec<u8>>;
