//! Transport configuration.
//!
//! `TransportConfig` controls how the default [`ReqwestTransport`](crate::net::ReqwestTransport)
//! builds its `reqwest::Client`. It provides sensible defaults via [`Default`] and a fluent
//! [`TransportConfig::builder()`] for customization with validation.
//!
//! ```rust
//! use std::time::Duration;
//! use trip::config::TransportConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = TransportConfig::builder()
//!     .user_agent("my-service/2.0")
//!     .timeout(Duration::from_secs(5))
//!     .max_redirects(0)
//!     .build()?;
//! assert_eq!(cfg.max_redirects, 0);
//! # Ok(()) }
//! ```
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("trip/", env!("CARGO_PKG_VERSION"));
const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Total time allowed for a single exchange. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection
    pub connect_timeout: Option<Duration>,
    /// Number of redirects followed before giving up. 0 disables redirects.
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            connect_timeout: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl TransportConfig {
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    inner: TransportConfig,
}

impl TransportConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut TransportConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn timeout(self, d: Duration) -> Self { self.map(|c| c.timeout = Some(d)) }
    pub fn connect_timeout(self, d: Duration) -> Self { self.map(|c| c.connect_timeout = Some(d)) }
    pub fn max_redirects(self, n: usize) -> Self { self.map(|c| c.max_redirects = n) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<TransportConfig, TransportConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportConfigError {
    #[error("user_agent must not be empty")]
    EmptyUserAgent,

    #[error("timeout must be larger than zero")]
    ZeroTimeout,

    #[error("connect_timeout must be larger than zero")]
    ZeroConnectTimeout,
}

fn validate(c: &TransportConfig) -> Result<(), TransportConfigError> {
    if c.user_agent.trim().is_empty() {
        return Err(TransportConfigError::EmptyUserAgent);
    }
    if c.timeout == Some(Duration::ZERO) {
        return Err(TransportConfigError::ZeroTimeout);
    }
    if c.connect_timeout == Some(Duration::ZERO) {
        return Err(TransportConfigError::ZeroConnectTimeout);
    }
    Ok(())
}
