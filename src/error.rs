// Error taxonomy for the client. Every variant is fatal for the example
// program; the binary prints it and exits with status 1.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Wrong number of positional arguments.
    #[error("{0}")]
    Usage(String),

    /// Connection, TLS or I/O failure while sending a request or reading
    /// its body.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected. The raw body
    /// is kept so it can be shown to the user.
    #[error("could not decode response from {url}: {source}\nbody: {body}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request form could not be serialized.
    #[error("could not encode {field}: {source}")]
    Encode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
