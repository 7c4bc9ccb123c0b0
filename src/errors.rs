use std::sync::Arc;

use crate::command::{BAD_RESPONSE, PARSE_FAILURE};

/// Failure to complete an exchange at all: no response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no request to send")]
    MissingRequest,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure to turn a response body into a model.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Error returned (and remembered) by a [`Command`](crate::Command) execution.
///
/// Transport and parse errors are surfaced as-is: the display text is the text
/// of the underlying error. An unacceptable response displays its status line,
/// e.g. `404 Not Found`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Transport(Arc<TransportError>),

    #[error("{line}")]
    Unacceptable { status: u16, line: String },

    #[error(transparent)]
    Parse(Arc<ParseError>),
}

impl CommandError {
    /// Status code that goes with this error.
    ///
    /// [`BAD_RESPONSE`] for transport failures, [`PARSE_FAILURE`] for parse failures and the
    /// real HTTP status for responses rejected by the acceptability check.
    pub fn status_code(&self) -> u16 {
        match self {
            CommandError::Transport(_) => BAD_RESPONSE,
            CommandError::Unacceptable { status, .. } => *status,
            CommandError::Parse(_) => PARSE_FAILURE,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CommandError::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CommandError::Parse(_))
    }
}

impl From<TransportError> for CommandError {
    fn from(e: TransportError) -> Self {
        CommandError::Transport(Arc::new(e))
    }
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        CommandError::Parse(Arc::new(e))
    }
}
