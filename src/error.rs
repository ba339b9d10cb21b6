// Error types shared by the library modules.
// The binary wraps these in `anyhow` at the top level; inside the crate
// we keep them typed so callers can tell transport problems from bad
// payloads and from requests the API itself refused.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single request against the meme API.
#[derive(Debug, Error)]
pub enum MemeError {
    /// The request never produced a response body (unreachable host,
    /// connection reset, TLS failure, ...).
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// The HTTP client itself could not be set up (TLS backend, bad
    /// builder settings). No request was attempted.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// A response arrived but it is not the JSON shape we expect.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The API answered with `success: false` on an endpoint where that
    /// leaves us with nothing to return.
    #[error("API error: {0}")]
    Api(String),
}

/// Problems with the local configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
}
